use super::*;

/// A call to a named function. Only a handful of names can be translated to
/// SQL; anything else is rejected by the translator.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    pub name: String,
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn func(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        ExprFunc {
            name: name.into(),
            args: args.into_iter().collect(),
        }
        .into()
    }

    pub fn starts_with(expr: impl Into<Self>, prefix: impl Into<Self>) -> Self {
        Expr::func("starts_with", [expr.into(), prefix.into()])
    }

    pub fn contains(expr: impl Into<Self>, needle: impl Into<Self>) -> Self {
        Expr::func("contains", [expr.into(), needle.into()])
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}
