mod builder;
pub use builder::Builder;

mod descriptor;
pub use descriptor::{Describe, Descriptor, TypeRef};

mod junction;
pub use junction::{Junction, JunctionNaming};

mod member;
pub use member::{Cascade, MemberKind, TableMemberInfo};

mod table;
pub use table::{TableId, TableInfo};

use crate::{Error, Result};
use std::{any::TypeId, collections::HashMap};

/// The table and member graph of every registered entity type.
///
/// Tables live in an arena and refer to each other by [`TableId`], so cyclic
/// relations need no shared ownership. The schema is immutable once built.
#[derive(Debug)]
pub struct Schema {
    pub tables: Vec<TableInfo>,

    by_type: HashMap<TypeId, TableId>,
}

/// A column somewhere in the schema that stores keys of another table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referrer {
    pub table: String,
    pub column: String,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn table(&self, id: impl Into<TableId>) -> &TableInfo {
        self.tables.get(id.into().0).expect("invalid table ID")
    }

    pub fn table_for_type(&self, id: TypeId) -> Option<&TableInfo> {
        self.by_type.get(&id).map(|id| self.table(*id))
    }

    /// Returns the table for `T`, or an error naming the type if it was not
    /// registered.
    pub fn table_for<T: 'static>(&self) -> Result<&TableInfo> {
        self.table_for_type(TypeId::of::<T>()).ok_or_else(|| {
            Error::invalid_schema(format!(
                "`{}` is not registered",
                descriptor::short_type_name(std::any::type_name::<T>())
            ))
        })
    }

    /// The table followed by its ancestors, nearest first.
    pub fn chain(&self, id: TableId) -> impl Iterator<Item = &TableInfo> + '_ {
        let table = self.table(id);
        std::iter::once(table).chain(table.ancestors.iter().map(|id| self.table(*id)))
    }

    /// Returns `true` if `id` is `ancestor` or inherits from it.
    pub fn is_a(&self, id: TableId, ancestor: TableId) -> bool {
        self.chain(id).any(|table| table.id == ancestor)
    }

    /// Every member of the table including inherited ones, root-most
    /// ancestor first, paired with the table that stores it.
    pub fn all_members(&self, id: TableId) -> Vec<(&TableInfo, &TableMemberInfo)> {
        let chain: Vec<_> = self.chain(id).collect();

        chain
            .into_iter()
            .rev()
            .flat_map(|table| table.members.iter().map(move |member| (table, member)))
            .collect()
    }

    /// Finds a member by name on the table or any of its ancestors.
    pub fn member(&self, id: TableId, name: &str) -> Option<(&TableInfo, &TableMemberInfo)> {
        self.chain(id)
            .find_map(|table| table.member(name).map(|member| (table, member)))
    }

    /// Every column in the schema that stores keys of table `id`: reference
    /// columns targeting it and the related side of collection junctions.
    pub fn referencing(&self, id: TableId) -> Vec<Referrer> {
        let mut ret = vec![];

        for table in &self.tables {
            for member in &table.members {
                match &member.kind {
                    MemberKind::Reference { column, target, .. } if *target == id => {
                        ret.push(Referrer {
                            table: table.name.clone(),
                            column: column.clone(),
                        });
                    }
                    MemberKind::Collection { target, junction } if *target == id => {
                        ret.push(Referrer {
                            table: junction.name.clone(),
                            column: Junction::RELATED.to_string(),
                        });
                    }
                    _ => {}
                }
            }
        }

        ret
    }

    /// Every junction table, in table then member order.
    pub fn junctions(&self) -> impl Iterator<Item = (&TableInfo, &TableMemberInfo, &Junction)> {
        self.tables.iter().flat_map(|table| {
            table.members.iter().filter_map(move |member| match &member.kind {
                MemberKind::Collection { junction, .. } => Some((table, member, junction)),
                _ => None,
            })
        })
    }
}
