use super::Fragment;

/// `SELECT ... FROM table [JOIN ...] WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub from: TableRef,

    /// Ancestor tables joined on the shared key
    pub joins: Vec<Join>,

    pub returning: Returning,

    /// Conditions, combined with AND in order
    pub filter: Vec<Fragment>,

    pub order_by: Option<Column>,

    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: String,
    pub alias: String,
}

/// `INNER JOIN table AS alias ON alias.column = parent.column`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub lhs: Column,
    pub rhs: Column,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub alias: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Returning {
    Columns(Vec<Column>),

    /// `SELECT 1`, used for existence checks
    One,
}

impl Select {
    pub fn new(from: TableRef, returning: Returning) -> Self {
        Self {
            from,
            joins: vec![],
            returning,
            filter: vec![],
            order_by: None,
            limit: None,
        }
    }
}

impl TableRef {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }
}

impl Column {
    pub fn new(alias: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.map(str::to_string),
            name: name.into(),
        }
    }
}

impl Returning {
    pub fn len(&self) -> usize {
        match self {
            Returning::Columns(columns) => columns.len(),
            Returning::One => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Select> for super::Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
