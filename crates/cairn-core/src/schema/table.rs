use super::TableMemberInfo;
use std::any::TypeId;

/// Mapping of one entity type to its table.
#[derive(Debug)]
pub struct TableInfo {
    /// Uniquely identifies the table
    pub id: TableId,

    /// Name of the table, prefix included
    pub name: String,

    /// Rust type the table stores, used in error messages
    pub type_name: &'static str,

    pub type_id: TypeId,

    /// The integer key column. Tables that extend another share its key name
    /// and reference the ancestor row through it.
    pub key: String,

    /// Members declared by this type, excluding the key and inherited members
    pub members: Vec<TableMemberInfo>,

    /// Tables this one extends, nearest first
    pub ancestors: Vec<TableId>,
}

/// Uniquely identifies a table
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

impl TableInfo {
    pub fn member(&self, name: &str) -> Option<&TableMemberInfo> {
        self.members.iter().find(|member| member.name == name)
    }

    /// The nearest ancestor, if the type extends another.
    pub fn parent(&self) -> Option<TableId> {
        self.ancestors.first().copied()
    }

    pub fn is_root(&self) -> bool {
        self.ancestors.is_empty()
    }

    /// Column names stored in this table, key first.
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(&self.key[..]).chain(self.members.iter().filter_map(|m| m.column()))
    }
}

impl TableId {
    pub(crate) fn placeholder() -> Self {
        Self(usize::MAX)
    }
}
