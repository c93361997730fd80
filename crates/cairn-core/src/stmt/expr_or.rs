use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprOr {
    pub operands: Vec<Expr>,
}

impl Expr {
    /// Combines two expressions with OR, flattening nested ORs while keeping
    /// operand order.
    pub fn or(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let lhs = lhs.into();
        let rhs = rhs.into();

        if lhs.is_false() {
            return rhs;
        }

        if rhs.is_false() {
            return lhs;
        }

        let mut operands = match lhs {
            Self::Or(or) => or.operands,
            lhs => vec![lhs],
        };

        match rhs {
            Self::Or(or) => operands.extend(or.operands),
            rhs => operands.push(rhs),
        }

        ExprOr { operands }.into()
    }

    pub fn or_from_vec(operands: Vec<Self>) -> Self {
        operands.into_iter().fold(false.into(), Expr::or)
    }
}

impl From<ExprOr> for Expr {
    fn from(value: ExprOr) -> Self {
        Self::Or(value)
    }
}
