use super::*;

/// A placeholder whose value is supplied when the statement executes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprVar {
    pub name: String,
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        ExprVar { name: name.into() }.into()
    }
}

impl From<ExprVar> for Expr {
    fn from(value: ExprVar) -> Self {
        Self::Var(value)
    }
}
