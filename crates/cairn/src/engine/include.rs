use super::{select::CHUNK, Cx};
use crate::Result;

use async_recursion::async_recursion;
use cairn_core::{
    schema::{Junction, MemberKind, TableId},
    sql::{alias, Column, Fragment, Returning, Select, TableRef},
    stmt::{self, Bindings, Record, Type, Value},
    Error, Schema,
};
use indexmap::{IndexMap, IndexSet};

/// Tree of members to load along with the queried entities.
#[derive(Debug, Default, Clone)]
pub(crate) struct Include {
    children: IndexMap<String, Include>,
}

impl Include {
    /// Adds `path` and every member it passes through.
    pub(crate) fn insert(&mut self, path: &stmt::Path) {
        let mut node = self;
        for step in &path.steps {
            node = node.children.entry(step.clone()).or_default();
        }
    }

    pub(crate) fn contains(&self, member: &str) -> bool {
        self.children.contains_key(member)
    }

    /// Adds every reference of `table` that is not already included.
    pub(super) fn with_relations(mut self, schema: &Schema, table: TableId) -> Self {
        for (_, member) in schema.all_members(table) {
            if member.is_relation() && !self.contains(&member.name) {
                self.children.insert(member.name.clone(), Include::default());
            }
        }
        self
    }
}

impl Cx<'_> {
    /// Replaces the short links and unloaded collections of `records` named
    /// by `include` with the related entities.
    #[async_recursion]
    pub(super) async fn include(
        &mut self,
        table: TableId,
        records: &mut [Record],
        include: &Include,
    ) -> Result<()> {
        let schema = self.schema;

        if records.is_empty() {
            return Ok(());
        }

        for (name, nested) in &include.children {
            let Some((_, member)) = schema.member(table, name) else {
                return Err(Error::invalid_statement(format!(
                    "`{}` has no member `{name}`",
                    schema.table(table).type_name
                )));
            };

            match &member.kind {
                MemberKind::Reference {
                    target,
                    by_id: false,
                    ..
                } => self.include_reference(name, *target, records, nested).await?,
                MemberKind::Collection { target, junction } => {
                    self.include_collection(table, name, *target, junction, records, nested)
                        .await?
                }
                _ => {
                    return Err(Error::invalid_statement(format!(
                        "cannot include member `{name}`"
                    )))
                }
            }
        }

        Ok(())
    }

    async fn include_reference(
        &mut self,
        name: &str,
        target: TableId,
        records: &mut [Record],
        nested: &Include,
    ) -> Result<()> {
        let keys: IndexSet<i64> = records
            .iter()
            .filter_map(|record| record.value(name).as_i64())
            .collect();

        let key = &self.schema.table(target).key;
        let related = self.load_keys(target, &keys.into_iter().collect::<Vec<_>>(), nested).await?;
        let related = by_key(related, key);

        for record in records {
            let Some(id) = record.value(name).as_i64() else {
                continue;
            };

            // A dangling key stays a short link
            if let Some(entity) = related.get(&id) {
                record.insert(name, entity.clone());
            }
        }

        Ok(())
    }

    async fn include_collection(
        &mut self,
        table: TableId,
        name: &str,
        target: TableId,
        junction: &Junction,
        records: &mut [Record],
        nested: &Include,
    ) -> Result<()> {
        let owner_key = &self.schema.table(table).key;
        let owners: Vec<i64> = records
            .iter()
            .filter_map(|record| record.key(owner_key))
            .collect();

        let links = self.junction_links(junction, &owners).await?;

        let keys: IndexSet<i64> = links.iter().map(|(_, related)| *related).collect();
        let related = self.load_keys(target, &keys.into_iter().collect::<Vec<_>>(), nested).await?;
        let related = by_key(related, &self.schema.table(target).key);

        for record in records {
            let Some(owner) = record.key(owner_key) else {
                continue;
            };

            let items = links
                .iter()
                .filter(|(link_owner, _)| *link_owner == owner)
                .filter_map(|(_, key)| related.get(key).cloned())
                .map(Value::Record)
                .collect();

            record.insert(name, Value::List(items));
        }

        Ok(())
    }

    /// `(owner, related)` pairs of the junction for `owners`, ordered by the
    /// related key.
    pub(super) async fn junction_links(
        &mut self,
        junction: &Junction,
        owners: &[i64],
    ) -> Result<Vec<(i64, i64)>> {
        let alias = alias(0, 0);
        let owner = Column::new(Some(&alias), Junction::OWNER);
        let related = Column::new(Some(&alias), Junction::RELATED);
        let bindings = Bindings::new();

        let mut links = vec![];

        for chunk in owners.chunks(CHUNK) {
            let mut stmt = Select::new(
                TableRef::new(&junction.name, &alias),
                Returning::Columns(vec![owner.clone(), related.clone()]),
            );
            stmt.filter = vec![Fragment::column_in(
                Some(&alias),
                Junction::OWNER,
                chunk.iter().map(|key| Value::I64(*key)),
            )];
            stmt.order_by = Some(related.clone());

            let rows = self.query(stmt, &bindings, vec![Type::I64, Type::I64]).await?;

            links.extend(rows.iter().filter_map(|row| match &row[..] {
                [Value::I64(owner), Value::I64(related)] => Some((*owner, *related)),
                _ => None,
            }));
        }

        if owners.len() > CHUNK {
            links.sort_by_key(|(_, related)| *related);
        }

        Ok(links)
    }
}

fn by_key(records: Vec<Record>, key: &str) -> IndexMap<i64, Record> {
    records
        .into_iter()
        .filter_map(|record| Some((record.key(key)?, record)))
        .collect()
}
