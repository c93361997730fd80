mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_func;
pub use expr_func::ExprFunc;

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_var;
pub use expr_var::ExprVar;

mod op_binary;
pub use op_binary::BinaryOp;

mod path;
pub use path::Path;

mod record;
pub use record::Record;

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

/// Values bound to named variables of a parameterized statement.
pub type Bindings = indexmap::IndexMap<String, Value>;

/// One positional row returned by a driver.
pub type Row = Vec<Value>;
