use crate::stmt::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: Type,
    pub nullable: bool,

    /// The database assigns the value on insert
    pub auto_increment: bool,

    pub references: Option<ForeignKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            auto_increment: false,
            references: None,
        }
    }
}

impl From<CreateTable> for super::Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
