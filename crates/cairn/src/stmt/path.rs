use super::{Expr, IntoExpr};
use crate::Ref;

use cairn_core::stmt::{self, BinaryOp};

use std::{fmt, marker::PhantomData};

/// A member chain starting at entity `M` and ending on a value of type `T`.
pub struct Path<M, T> {
    pub(crate) untyped: stmt::Path,
    _p: PhantomData<fn() -> (M, T)>,
}

impl<M, T> Path<M, T> {
    pub fn new(member: impl Into<String>) -> Self {
        Self::from_untyped(stmt::Path::new(member))
    }

    pub fn from_untyped(untyped: stmt::Path) -> Self {
        Self {
            untyped,
            _p: PhantomData,
        }
    }

    pub fn untyped(&self) -> &stmt::Path {
        &self.untyped
    }

    pub fn eq(self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(BinaryOp::Eq, rhs)
    }

    pub fn ne(self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(BinaryOp::Ne, rhs)
    }

    pub fn gt(self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(BinaryOp::Gt, rhs)
    }

    pub fn ge(self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(BinaryOp::Ge, rhs)
    }

    pub fn lt(self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(BinaryOp::Lt, rhs)
    }

    pub fn le(self, rhs: impl IntoExpr<T>) -> Expr<bool> {
        self.compare(BinaryOp::Le, rhs)
    }

    pub fn is_null(self) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::is_null(self.untyped))
    }

    pub fn is_not_null(self) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::is_not_null(self.untyped))
    }

    pub fn in_set<I>(self, items: impl IntoIterator<Item = I>) -> Expr<bool>
    where
        I: IntoExpr<T>,
    {
        Expr::from_untyped(stmt::Expr::in_list(
            self.untyped,
            items.into_iter().map(|item| item.into_expr().untyped),
        ))
    }

    fn compare(self, op: BinaryOp, rhs: impl IntoExpr<T>) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::binary_op(
            self.untyped,
            op,
            rhs.into_expr().untyped,
        ))
    }
}

impl<M> Path<M, String> {
    pub fn starts_with(self, prefix: &str) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::starts_with(self.untyped, prefix))
    }

    pub fn contains(self, needle: &str) -> Expr<bool> {
        Expr::from_untyped(stmt::Expr::contains(self.untyped, needle))
    }
}

impl<M, U> Path<M, Ref<U>> {
    /// Continues the chain through the reference to `member` of the related
    /// entity.
    pub fn to<V>(mut self, member: impl Into<String>) -> Path<M, V> {
        self.untyped.push(member);
        Path::from_untyped(self.untyped)
    }
}

impl<M, T> Clone for Path<M, T> {
    fn clone(&self) -> Self {
        Self::from_untyped(self.untyped.clone())
    }
}

impl<M, T> fmt::Debug for Path<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.untyped)
    }
}

impl<M, T> IntoExpr<T> for Path<M, T> {
    fn into_expr(self) -> Expr<T> {
        Expr::from_untyped(self.untyped)
    }
}

impl<M, T> From<Path<M, T>> for stmt::Path {
    fn from(value: Path<M, T>) -> Self {
        value.untyped
    }
}
