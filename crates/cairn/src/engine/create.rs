use super::Cx;
use crate::Result;

use async_recursion::async_recursion;
use cairn_core::{
    schema::{Junction, MemberKind, TableId, TableMemberInfo},
    sql::{Delete, Fragment, Insert},
    stmt::{Record, Value},
    Error, Schema,
};
use indexmap::IndexSet;

impl Cx<'_> {
    /// Inserts `record` as an entity of `table`, writing the generated key
    /// and the keys of created related entities back into it.
    #[async_recursion]
    pub(super) async fn create(&mut self, table: TableId, record: &mut Record) -> Result<i64> {
        let schema = self.schema;
        let info = schema.table(table);

        if let Some(key) = record.key(&info.key) {
            return Err(Error::invalid_statement(format!(
                "`{}` row {key} is already saved",
                info.type_name
            )));
        }

        self.save_references(table, record, false).await?;

        // Root-most table first; descendants reuse its generated key
        let chain: Vec<_> = schema.chain(table).collect();
        let mut key = None;

        for owner in chain.into_iter().rev() {
            let mut columns = vec![];
            let mut values = vec![];

            if let Some(key) = key {
                columns.push(owner.key.clone());
                values.push(Value::I64(key));
            }

            for member in &owner.members {
                if let Some(column) = member.column() {
                    columns.push(column.to_string());
                    values.push(column_value(schema, member, record));
                }
            }

            let insert = Insert {
                table: owner.name.clone(),
                columns,
                values,
                returning: key.is_none().then(|| owner.key.clone()),
            };

            match key {
                None => key = Some(self.insert(insert).await?),
                Some(_) => {
                    self.execute(insert).await?;
                }
            }
        }

        let key = key.ok_or_else(|| {
            Error::invalid_result(format!("no key generated for `{}`", info.type_name))
        })?;
        record.insert(&info.key, key);

        self.link_collections(table, key, record, false).await?;

        tracing::debug!(table = %info.name, key, "created entity");
        Ok(key)
    }

    /// Saves the loaded references of `record` as their cascade policy says.
    /// Afterwards every loaded reference has a key.
    pub(super) async fn save_references(
        &mut self,
        table: TableId,
        record: &mut Record,
        update: bool,
    ) -> Result<()> {
        let schema = self.schema;

        for (_, member) in schema.all_members(table) {
            let MemberKind::Reference {
                target,
                by_id: false,
                ..
            } = &member.kind
            else {
                continue;
            };

            let Some(related) = record.get_mut(&member.name).and_then(Value::as_record_mut) else {
                continue;
            };

            match related.key(&schema.table(*target).key) {
                None if member.cascade.create => {
                    self.create(*target, related).await?;
                }
                None => return Err(unsaved(schema, member, *target)),
                Some(_) if update && member.cascade.update => {
                    self.update(*target, related).await?;
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Makes the junction rows of every loaded collection of `record` match
    /// its elements. On create there are no previous links to remove.
    pub(super) async fn link_collections(
        &mut self,
        table: TableId,
        key: i64,
        record: &mut Record,
        update: bool,
    ) -> Result<()> {
        let schema = self.schema;

        for (_, member) in schema.all_members(table) {
            let MemberKind::Collection { target, junction } = &member.kind else {
                continue;
            };

            // Not loaded
            let Some(items) = record.get_mut(&member.name).and_then(Value::as_list_mut) else {
                continue;
            };

            let target_key = &schema.table(*target).key;
            let mut linked = IndexSet::new();

            for item in items.iter_mut() {
                match item {
                    Value::Record(element) => match element.key(target_key) {
                        Some(related) => {
                            if update && member.cascade.update {
                                self.update(*target, element).await?;
                            }
                            linked.insert(related);
                        }
                        None if member.cascade.create => {
                            linked.insert(self.create(*target, element).await?);
                        }
                        None => return Err(unsaved(schema, member, *target)),
                    },
                    Value::I64(related) => {
                        linked.insert(*related);
                    }
                    _ => {}
                }
            }

            let existing: IndexSet<i64> = if update {
                self.junction_links(junction, &[key])
                    .await?
                    .into_iter()
                    .map(|(_, related)| related)
                    .collect()
            } else {
                IndexSet::new()
            };

            let removed: Vec<i64> = existing.difference(&linked).copied().collect();

            if !removed.is_empty() {
                self.unlink(junction, key, &removed).await?;

                if member.cascade.delete {
                    self.delete_keys(*target, removed).await?;
                }
            }

            for related in linked.difference(&existing) {
                self.execute(Insert {
                    table: junction.name.clone(),
                    columns: vec![Junction::OWNER.to_string(), Junction::RELATED.to_string()],
                    values: vec![Value::I64(key), Value::I64(*related)],
                    returning: None,
                })
                .await?;
            }
        }

        Ok(())
    }

    async fn unlink(&mut self, junction: &Junction, owner: i64, related: &[i64]) -> Result<()> {
        let filter = vec![
            Fragment::column_eq(None, Junction::OWNER, owner),
            Fragment::column_in(
                None,
                Junction::RELATED,
                related.iter().map(|key| Value::I64(*key)),
            ),
        ];

        self.execute(Delete {
            table: junction.name.clone(),
            filter,
        })
        .await?;

        Ok(())
    }
}

/// The value stored in `member`'s column. Loaded references store their key.
pub(super) fn column_value(schema: &Schema, member: &TableMemberInfo, record: &Record) -> Value {
    let value = record.value(&member.name);

    match (&member.kind, value) {
        (MemberKind::Reference { target, .. }, Value::Record(related)) => related
            .key(&schema.table(*target).key)
            .map(Value::I64)
            .unwrap_or_default(),
        _ => value.clone(),
    }
}

fn unsaved(schema: &Schema, member: &TableMemberInfo, target: TableId) -> Error {
    Error::invalid_statement(format!(
        "member `{}` holds an unsaved `{}`; save it first or enable the create cascade",
        member.name,
        schema.table(target).type_name
    ))
}
