//! The typed predicate surface.
//!
//! Typed paths and expressions wrap their untyped counterparts in
//! [`cairn_core::stmt`]. The type parameters only guide construction; the
//! translator works on the untyped tree.

mod expr;
pub use expr::Expr;

mod field;
pub use field::{Field, RecordExt};

mod into_expr;
pub use into_expr::IntoExpr;

mod path;
pub use path::Path;

pub use cairn_core::stmt::{Record, Type, Value};

/// A named variable of type `T`, bound later with `set_variable` or
/// `prepare`.
pub fn var<T>(name: impl Into<String>) -> Expr<T> {
    Expr::from_untyped(cairn_core::stmt::Expr::var(name))
}
