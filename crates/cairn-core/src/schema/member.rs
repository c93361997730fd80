use super::{Junction, TableId};
use crate::stmt::{Type, Value};

/// One persisted member of an entity.
#[derive(Debug)]
pub struct TableMemberInfo {
    pub name: String,
    pub kind: MemberKind,

    /// The member may be absent. Nullable columns and references store `NULL`.
    pub nullable: bool,

    pub cascade: Cascade,
}

/// A member is exactly one of these.
#[derive(Debug)]
pub enum MemberKind {
    /// Plain scalar column
    Column { column: String, ty: Type },

    /// Single reference stored as the related row's key.
    ///
    /// When `by_id` is set the member itself is the key value; otherwise the
    /// member holds the related entity (or a short link to it).
    Reference {
        column: String,
        target: TableId,
        by_id: bool,
    },

    /// Many related entities linked through a junction table
    Collection { target: TableId, junction: Junction },
}

/// Which lifecycle events of the owner propagate to the related entities.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cascade {
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl TableMemberInfo {
    /// The column storing the member, if it is stored in the owner's table.
    pub fn column(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Column { column, .. } | MemberKind::Reference { column, .. } => {
                Some(column)
            }
            MemberKind::Collection { .. } => None,
        }
    }

    /// The table of the related entity for references and collections.
    pub fn target(&self) -> Option<TableId> {
        match &self.kind {
            MemberKind::Reference { target, .. } | MemberKind::Collection { target, .. } => {
                Some(*target)
            }
            MemberKind::Column { .. } => None,
        }
    }

    /// Storage type of the member's column.
    pub fn ty(&self) -> Option<Type> {
        match &self.kind {
            MemberKind::Column { ty, .. } => Some(*ty),
            MemberKind::Reference { .. } => Some(Type::I64),
            MemberKind::Collection { .. } => None,
        }
    }

    pub fn is_column(&self) -> bool {
        matches!(self.kind, MemberKind::Column { .. })
    }

    /// True for references that materialize the related entity.
    pub fn is_relation(&self) -> bool {
        matches!(self.kind, MemberKind::Reference { by_id: false, .. })
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.kind, MemberKind::Collection { .. })
    }

    pub fn junction(&self) -> Option<&Junction> {
        match &self.kind {
            MemberKind::Collection { junction, .. } => Some(junction),
            _ => None,
        }
    }

    /// Value the member holds when it was not loaded. Collections hold `Null`,
    /// which marks them as not loaded so saves leave their links untouched.
    pub fn default_value(&self) -> Value {
        match &self.kind {
            _ if self.nullable => Value::Null,
            MemberKind::Column { ty, .. } => ty.default_value(),
            MemberKind::Reference { by_id: true, .. } => Value::I64(0),
            MemberKind::Reference { .. } => Value::Null,
            MemberKind::Collection { .. } => Value::Null,
        }
    }
}

impl Cascade {
    pub fn all() -> Self {
        Self {
            create: true,
            update: true,
            delete: true,
        }
    }
}
