use super::Expr;
use crate::{Ref, Storable};

use cairn_core::stmt::Value;

pub trait IntoExpr<T> {
    fn into_expr(self) -> Expr<T>;
}

impl<T> IntoExpr<T> for Expr<T> {
    fn into_expr(self) -> Self {
        self
    }
}

macro_rules! impl_into_expr_for_primitive {
    ( $( $t:ty ),* ) => {
        $(
            impl IntoExpr<$t> for $t {
                fn into_expr(self) -> Expr<$t> {
                    Expr::from_value(Value::from(self))
                }
            }

            impl IntoExpr<Option<$t>> for $t {
                fn into_expr(self) -> Expr<Option<$t>> {
                    Expr::from_value(Value::from(self))
                }
            }

            impl IntoExpr<Option<$t>> for Option<$t> {
                fn into_expr(self) -> Expr<Option<$t>> {
                    Expr::from_value(Value::from(self))
                }
            }
        )*
    };
}

impl_into_expr_for_primitive!(bool, i64, f64, String);

impl IntoExpr<i64> for i32 {
    fn into_expr(self) -> Expr<i64> {
        Expr::from_value(Value::from(self))
    }
}

impl IntoExpr<Option<i64>> for i32 {
    fn into_expr(self) -> Expr<Option<i64>> {
        Expr::from_value(Value::from(self))
    }
}

impl IntoExpr<String> for &str {
    fn into_expr(self) -> Expr<String> {
        Expr::from_value(Value::from(self))
    }
}

impl IntoExpr<Option<String>> for &str {
    fn into_expr(self) -> Expr<Option<String>> {
        Expr::from_value(Value::from(self))
    }
}

impl IntoExpr<String> for &String {
    fn into_expr(self) -> Expr<String> {
        Expr::from_value(Value::from(self))
    }
}

/// A reference compares by the related entity's key.
impl<T> IntoExpr<Ref<T>> for i64 {
    fn into_expr(self) -> Expr<Ref<T>> {
        Expr::from_value(Value::I64(self))
    }
}

impl<T: Storable> IntoExpr<Ref<T>> for &Ref<T> {
    fn into_expr(self) -> Expr<Ref<T>> {
        Expr::from_value(Value::from(self.id()))
    }
}
