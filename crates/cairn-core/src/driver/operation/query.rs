use crate::{
    sql,
    stmt::{Bindings, Type},
};

#[derive(Debug, Clone)]
pub struct Query {
    /// The statement to execute
    pub stmt: sql::Statement,

    /// Values for the variables referenced by the statement
    pub bindings: Bindings,

    /// Column types of each returned row
    pub ret: Option<Vec<Type>>,
}

impl Query {
    pub fn new(stmt: impl Into<sql::Statement>) -> Self {
        Self {
            stmt: stmt.into(),
            bindings: Bindings::new(),
            ret: None,
        }
    }

    pub fn returning(mut self, ret: Vec<Type>) -> Self {
        self.ret = Some(ret);
        self
    }

    pub fn bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }
}
