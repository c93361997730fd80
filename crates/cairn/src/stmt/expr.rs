use super::IntoExpr;

use cairn_core::stmt::{self, Value};

use std::{fmt, marker::PhantomData, ops::Not};

pub struct Expr<T> {
    /// The un-typed expression
    pub(crate) untyped: stmt::Expr,

    /// `T` is the type of the expression
    _p: PhantomData<fn() -> T>,
}

impl<T> Expr<T> {
    /// Create an expression from the given value.
    pub(crate) fn from_value(value: Value) -> Self {
        Self::from_untyped(stmt::Expr::Value(value))
    }

    pub fn from_untyped(untyped: impl Into<stmt::Expr>) -> Self {
        Self {
            untyped: untyped.into(),
            _p: PhantomData,
        }
    }

    pub fn cast<U>(self) -> Expr<U> {
        Expr::from_untyped(self.untyped)
    }

    pub fn untyped(&self) -> &stmt::Expr {
        &self.untyped
    }
}

impl Expr<bool> {
    pub fn and(self, rhs: impl IntoExpr<bool>) -> Self {
        Self::from_untyped(stmt::Expr::and(self.untyped, rhs.into_expr().untyped))
    }

    /// All of the expressions hold. An empty set holds.
    pub fn and_all<E>(exprs: impl IntoIterator<Item = E>) -> Self
    where
        E: IntoExpr<bool>,
    {
        Self::from_untyped(stmt::Expr::and_from_vec(
            exprs.into_iter().map(|expr| expr.into_expr().untyped).collect(),
        ))
    }

    pub fn or(self, rhs: impl IntoExpr<bool>) -> Self {
        Self::from_untyped(stmt::Expr::or(self.untyped, rhs.into_expr().untyped))
    }

    /// Any of the expressions holds. An empty set never holds.
    pub fn or_any<E>(exprs: impl IntoIterator<Item = E>) -> Self
    where
        E: IntoExpr<bool>,
    {
        Self::from_untyped(stmt::Expr::or_from_vec(
            exprs.into_iter().map(|expr| expr.into_expr().untyped).collect(),
        ))
    }
}

impl Not for Expr<bool> {
    type Output = Self;

    fn not(self) -> Self {
        Self::from_untyped(stmt::Expr::not(self.untyped))
    }
}

impl<T> Clone for Expr<T> {
    fn clone(&self) -> Self {
        Self::from_untyped(self.untyped.clone())
    }
}

impl<T> fmt::Debug for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.untyped, f)
    }
}

impl<T> fmt::Display for Expr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.untyped, f)
    }
}

impl<T> From<Expr<T>> for stmt::Expr {
    fn from(value: Expr<T>) -> Self {
        value.untyped
    }
}
