use super::{
    descriptor::{DeclaredKind, Descriptor},
    Describe, Junction, JunctionNaming, MemberKind, Schema, TableId, TableInfo, TableMemberInfo,
    TypeRef,
};
use crate::{driver, Error, Result};

use indexmap::IndexMap;
use std::{any::TypeId, collections::HashMap};

#[derive(Debug, Default)]
pub struct Builder {
    /// If set, prefix all table names with this string
    table_name_prefix: Option<String>,

    /// Overrides the driver's identifier length limit for junction names
    max_identifier_length: Option<usize>,

    /// Registered entity types, in registration order
    types: Vec<TypeRef>,
}

/// Used to track state during the build process
struct BuildSchema<'a> {
    builder: &'a Builder,

    naming: JunctionNaming,

    /// Descriptors of every registered type, indexed by table ID
    descriptors: Vec<Descriptor>,

    /// Maps types to identifiers. The identifiers are reserved before the
    /// tables are built.
    table_lookup: HashMap<TypeId, TableId>,

    /// Table names, prefix applied
    names: Vec<String>,

    errors: Vec<Error>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn max_identifier_length(&mut self, len: usize) -> &mut Self {
        self.max_identifier_length = Some(len);
        self
    }

    pub fn register<T: Describe>(&mut self) -> &mut Self {
        self.register_type(TypeRef::of::<T>())
    }

    pub fn register_type(&mut self, ty: TypeRef) -> &mut Self {
        if !self.types.iter().any(|registered| registered.id == ty.id) {
            self.types.push(ty);
        }
        self
    }

    /// Builds the schema. All problems found are reported together, in
    /// registration order.
    pub fn build(&self, capability: &driver::Capability) -> Result<Schema> {
        let mut build = BuildSchema {
            builder: self,
            naming: JunctionNaming {
                max_identifier_length: self
                    .max_identifier_length
                    .unwrap_or(capability.max_identifier_length),
            },
            descriptors: vec![],
            table_lookup: HashMap::new(),
            names: vec![],
            errors: vec![],
        };

        // First pass: reserve a table for every registered type
        for ty in &self.types {
            build.build_table_stub(ty);
        }

        // Second pass: resolve inheritance and relations by table ID
        let tables = (0..build.descriptors.len())
            .map(|index| build.build_table(TableId(index)))
            .collect::<Vec<_>>();

        build.verify_columns(&tables);

        if !build.errors.is_empty() {
            return Err(Error::collect(build.errors));
        }

        tracing::debug!(tables = tables.len(), "built schema");

        Ok(Schema {
            tables,
            by_type: build.table_lookup,
        })
    }
}

impl BuildSchema<'_> {
    fn build_table_stub(&mut self, ty: &TypeRef) {
        let descriptor = ty.describe();

        if descriptor.ty.id != ty.id {
            self.error(
                ty.name,
                format!("describe() returned a descriptor for `{}`", descriptor.ty.name),
            );
        }

        let name = match &self.builder.table_name_prefix {
            Some(prefix) => format!("{prefix}{}", descriptor.table),
            None => descriptor.table.clone(),
        };

        if let Some(index) = self.names.iter().position(|existing| *existing == name) {
            let other = self.descriptors[index].type_name();
            self.error(ty.name, format!("table `{name}` is also used by `{other}`"));
        }

        let id = TableId(self.descriptors.len());
        self.table_lookup.insert(ty.id, id);
        self.names.push(name);
        self.descriptors.push(descriptor);
    }

    fn build_table(&mut self, id: TableId) -> TableInfo {
        let ancestors = self.resolve_ancestors(id);

        let descriptor = &self.descriptors[id.0];
        let type_name = descriptor.ty.name;
        let mut errors = descriptor.errors.clone();

        // The key is declared by the root-most ancestor
        let root = ancestors.last().copied().unwrap_or(id);
        let key = match (&self.descriptors[root.0].key, &descriptor.key) {
            (Some(root_key), Some(own)) if root_key != own => {
                errors.push(format!(
                    "key `{own}` differs from key `{root_key}` of `{}`",
                    self.descriptors[root.0].type_name()
                ));
                own.clone()
            }
            (Some(key), _) => key.clone(),
            (None, _) => {
                errors.push("has no key member".to_string());
                String::new()
            }
        };

        let mut members = vec![];

        for member in &descriptor.members {
            let target = match member.kind.target() {
                Some(target) => match self.table_lookup.get(&target.id) {
                    Some(target) => *target,
                    None => {
                        errors.push(format!(
                            "member `{}` refers to `{}`, which is not registered",
                            member.name, target.name
                        ));
                        TableId::placeholder()
                    }
                },
                None => TableId::placeholder(),
            };

            let kind = match &member.kind {
                DeclaredKind::Column(ty) => MemberKind::Column {
                    column: member.column.clone().unwrap_or_else(|| member.name.clone()),
                    ty: *ty,
                },
                DeclaredKind::ForeignKey(_) => MemberKind::Reference {
                    column: member.column.clone().unwrap_or_else(|| member.name.clone()),
                    target,
                    by_id: true,
                },
                DeclaredKind::Reference(_) => MemberKind::Reference {
                    column: member
                        .column
                        .clone()
                        .unwrap_or_else(|| format!("{}_id", member.name)),
                    target,
                    by_id: false,
                },
                DeclaredKind::Collection(_) => {
                    let related = self
                        .names
                        .get(target.0)
                        .map(String::as_str)
                        .unwrap_or_default();

                    MemberKind::Collection {
                        target,
                        junction: Junction {
                            name: self.naming.name(&self.names[id.0], related, &member.name),
                        },
                    }
                }
                DeclaredKind::NotInDb => continue,
            };

            members.push(TableMemberInfo {
                name: member.name.clone(),
                kind,
                nullable: member.nullable,
                cascade: member.cascade,
            });
        }

        for message in errors {
            self.error(type_name, message);
        }

        TableInfo {
            id,
            name: self.names[id.0].clone(),
            type_name,
            type_id: self.descriptors[id.0].ty.id,
            key,
            members,
            ancestors,
        }
    }

    /// Walks `extends` links, nearest first, stopping at cycles.
    fn resolve_ancestors(&mut self, id: TableId) -> Vec<TableId> {
        let type_name = self.descriptors[id.0].type_name();
        let mut ancestors = vec![];
        let mut current = id;

        while let Some(parent) = &self.descriptors[current.0].extends {
            let Some(parent_id) = self.table_lookup.get(&parent.id).copied() else {
                let message = format!("extends `{}`, which is not registered", parent.name);
                self.error(type_name, message);
                break;
            };

            if parent_id == id || ancestors.contains(&parent_id) {
                self.error(type_name, "inheritance cycle".to_string());
                break;
            }

            ancestors.push(parent_id);
            current = parent_id;
        }

        ancestors
    }

    /// Each table's chain must not store the same column name twice.
    fn verify_columns(&mut self, tables: &[TableInfo]) {
        for table in tables {
            let mut seen: IndexMap<&str, &TableInfo> = IndexMap::new();

            // Inherited columns are checked root-most first
            let chain = std::iter::once(table)
                .chain(table.ancestors.iter().map(|id| &tables[id.0]))
                .collect::<Vec<_>>();

            for owner in chain.into_iter().rev() {
                for column in owner.members.iter().filter_map(|member| member.column()) {
                    if column == table.key {
                        self.error(table.type_name, format!("column `{column}` is the key"));
                    } else if let Some(prev) = seen.insert(column, owner) {
                        let message = if prev.id == owner.id {
                            format!("declares column `{column}` twice")
                        } else {
                            format!(
                                "column `{column}` is already declared by `{}`",
                                prev.type_name
                            )
                        };

                        // Report conflicts once, on the table that declares them
                        if owner.id == table.id {
                            self.error(table.type_name, message);
                        }
                    }
                }
            }
        }
    }

    fn error(&mut self, type_name: &str, message: String) {
        self.errors
            .push(Error::invalid_schema(format!("`{type_name}` {message}")));
    }
}
