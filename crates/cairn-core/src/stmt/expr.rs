use super::*;

use std::fmt;

/// An untyped predicate expression.
///
/// The typed DSL in the `cairn` crate builds these; the translator in
/// `cairn-sql` walks them.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of expressions
    And(ExprAnd),

    /// Binary comparison
    BinaryOp(ExprBinaryOp),

    /// A named function call
    Func(ExprFunc),

    /// In list
    InList(ExprInList),

    /// Whether an expression is (or is not) null. This is different from a
    /// binary expression because of how databases treat null comparisons.
    IsNull(ExprIsNull),

    /// Negates a boolean expression
    Not(ExprNot),

    /// OR a set of expressions
    Or(ExprOr),

    /// References a member of the root entity, possibly through references
    Path(Path),

    /// A named variable bound when the statement executes
    Var(ExprVar),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Is a value that evaluates to null
    pub fn is_value_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns true if the expression is the `true` boolean expression
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    /// Returns `true` if the expression is the `false` boolean expression
    pub fn is_false(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(false)))
    }

    pub fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    pub fn path(path: impl Into<Path>) -> Self {
        Self::Path(path.into())
    }

    /// Names of all variables referenced by the expression, in the order they
    /// first appear.
    pub fn vars(&self) -> Vec<&str> {
        fn walk<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
            match expr {
                Expr::And(e) => e.operands.iter().for_each(|e| walk(e, out)),
                Expr::Or(e) => e.operands.iter().for_each(|e| walk(e, out)),
                Expr::Not(e) => walk(&e.expr, out),
                Expr::BinaryOp(e) => {
                    walk(&e.lhs, out);
                    walk(&e.rhs, out);
                }
                Expr::IsNull(e) => walk(&e.expr, out),
                Expr::InList(e) => {
                    walk(&e.expr, out);
                    e.list.iter().for_each(|e| walk(e, out));
                }
                Expr::Func(e) => e.args.iter().for_each(|e| walk(e, out)),
                Expr::Var(var) => {
                    if !out.contains(&&var.name[..]) {
                        out.push(&var.name);
                    }
                }
                Expr::Path(_) | Expr::Value(_) => {}
            }
        }

        let mut out = vec![];
        walk(self, &mut out);
        out
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_from_scalar!(i32, i64, f64, String, &String, &str);

impl From<Path> for Expr {
    fn from(value: Path) -> Self {
        Self::Path(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, items: &[Expr], sep: &str) -> fmt::Result {
            let mut s = "";
            for item in items {
                match item {
                    Expr::And(_) | Expr::Or(_) => write!(f, "{s}({item})")?,
                    _ => write!(f, "{s}{item}")?,
                }
                s = sep;
            }
            Ok(())
        }

        match self {
            Expr::And(e) => list(f, &e.operands, " && "),
            Expr::Or(e) => list(f, &e.operands, " || "),
            Expr::Not(e) => write!(f, "!({})", e.expr),
            Expr::BinaryOp(e) => write!(f, "{} {} {}", e.lhs, e.op, e.rhs),
            Expr::IsNull(e) if e.negate => write!(f, "{} != null", e.expr),
            Expr::IsNull(e) => write!(f, "{} == null", e.expr),
            Expr::InList(e) => {
                write!(f, "{} in [", e.expr)?;
                list(f, &e.list, ", ")?;
                f.write_str("]")
            }
            Expr::Func(e) => {
                write!(f, "{}(", e.name)?;
                list(f, &e.args, ", ")?;
                f.write_str(")")
            }
            Expr::Path(path) => write!(f, "{path}"),
            Expr::Var(var) => write!(f, "${}", var.name),
            Expr::Value(value) => write!(f, "{value}"),
        }
    }
}
