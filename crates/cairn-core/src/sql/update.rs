use super::Fragment;
use crate::stmt::Value;

/// `UPDATE table SET column = value, ... WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<(String, Value)>,
    pub filter: Vec<Fragment>,
}

impl From<Update> for super::Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
