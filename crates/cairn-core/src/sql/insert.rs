use crate::stmt::Value;

/// `INSERT INTO table (columns) VALUES (values)`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Value>,

    /// Generated key column to return. Only databases without a
    /// last-insert-id facility render this as `RETURNING`.
    pub returning: Option<String>,
}

impl From<Insert> for super::Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
