use super::Fragment;

/// `DELETE FROM table WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub filter: Vec<Fragment>,
}

impl From<Delete> for super::Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
