use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprAnd {
    pub operands: Vec<Expr>,
}

impl Expr {
    /// Combines two expressions with AND, flattening nested ANDs while keeping
    /// operand order.
    pub fn and(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let lhs = lhs.into();
        let rhs = rhs.into();

        if lhs.is_true() {
            return rhs;
        }

        if rhs.is_true() {
            return lhs;
        }

        let mut operands = match lhs {
            Self::And(and) => and.operands,
            lhs => vec![lhs],
        };

        match rhs {
            Self::And(and) => operands.extend(and.operands),
            rhs => operands.push(rhs),
        }

        ExprAnd { operands }.into()
    }

    pub fn and_from_vec(operands: Vec<Self>) -> Self {
        operands.into_iter().fold(true.into(), Expr::and)
    }
}

impl From<ExprAnd> for Expr {
    fn from(value: ExprAnd) -> Self {
        Self::And(value)
    }
}
