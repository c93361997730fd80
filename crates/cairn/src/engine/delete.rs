use super::{select::CHUNK, Cx, Request};
use crate::Result;

use async_recursion::async_recursion;
use cairn_core::{
    schema::{Junction, MemberKind, TableId, TableInfo},
    sql::{alias, Column, Delete, Fragment, Returning, Select, TableRef, Update},
    stmt::{Bindings, Type, Value},
    Error,
};
use indexmap::IndexSet;
use std::cmp::Reverse;

impl Cx<'_> {
    /// Deletes the entities matched by the request, returning how many were
    /// deleted.
    pub(super) async fn delete_matching(&mut self, request: &Request<'_>) -> Result<u64> {
        let keys = self.select_keys(request).await?;
        self.delete_keys(request.table, keys).await
    }

    /// Deletes the entities of `table` stored under `keys`. Rows stored as a
    /// derived type are deleted as that type.
    #[async_recursion]
    pub(super) async fn delete_keys(&mut self, table: TableId, keys: Vec<i64>) -> Result<u64> {
        let schema = self.schema;

        if keys.is_empty() {
            return Ok(0);
        }

        let mut descendants: Vec<&TableInfo> = schema
            .tables
            .iter()
            .filter(|other| other.id != table && schema.is_a(other.id, table))
            .collect();
        descendants.sort_by_key(|other| Reverse(other.ancestors.len()));

        let mut remaining: IndexSet<i64> = keys.into_iter().collect();
        let mut count = 0;

        for descendant in descendants {
            let keys: Vec<i64> = remaining.iter().copied().collect();
            let found = self
                .column_values(&descendant.name, &descendant.key, &descendant.key, &keys)
                .await?;

            if found.is_empty() {
                continue;
            }

            for key in &found {
                remaining.shift_remove(key);
            }

            count += self.delete_rows(descendant.id, found).await?;
        }

        count += self
            .delete_rows(table, remaining.into_iter().collect())
            .await?;

        Ok(count)
    }

    /// Deletes rows whose most derived table is `table`.
    #[async_recursion]
    async fn delete_rows(&mut self, table: TableId, keys: Vec<i64>) -> Result<u64> {
        let schema = self.schema;

        if keys.is_empty() {
            return Ok(0);
        }

        let mut dependents = vec![];

        for (owner, member) in schema.all_members(table) {
            match &member.kind {
                MemberKind::Collection { target, junction } => {
                    let elements = if member.cascade.delete {
                        let (related, owner) = (Junction::RELATED, Junction::OWNER);
                        self.column_values(&junction.name, related, owner, &keys).await?
                    } else {
                        vec![]
                    };

                    for chunk in keys.chunks(CHUNK) {
                        self.execute(Delete {
                            table: junction.name.clone(),
                            filter: vec![key_in(Junction::OWNER, chunk)],
                        })
                        .await?;
                    }

                    self.delete_keys(*target, elements).await?;
                }
                MemberKind::Reference { column, target, .. } if member.cascade.delete => {
                    let related = self
                        .column_values(&owner.name, column, &owner.key, &keys)
                        .await?;

                    if related.is_empty() {
                        continue;
                    }

                    if member.nullable {
                        // Detach, then delete the dependents before the root
                        for chunk in keys.chunks(CHUNK) {
                            self.execute(Update {
                                table: owner.name.clone(),
                                assignments: vec![(column.clone(), Value::Null)],
                                filter: vec![key_in(&owner.key, chunk)],
                            })
                            .await?;
                        }

                        self.delete_keys(*target, related).await?;
                    } else {
                        dependents.push((*target, related));
                    }
                }
                _ => {}
            }
        }

        self.check_links(table, &keys).await?;

        let mut count = None;

        for owner in schema.chain(table) {
            let mut deleted = 0;

            for chunk in keys.chunks(CHUNK) {
                deleted += self
                    .execute(Delete {
                        table: owner.name.clone(),
                        filter: vec![key_in(&owner.key, chunk)],
                    })
                    .await?;
            }

            count.get_or_insert(deleted);
        }

        // Non-nullable dependents are free once the root rows are gone
        for (target, related) in dependents {
            self.delete_keys(target, related).await?;
        }

        let count = count.unwrap_or_default();
        tracing::debug!(table = %schema.table(table).name, count, "deleted entities");
        Ok(count)
    }

    /// Fails when any row of the schema still stores one of `keys` as a
    /// reference to `table` or one of its ancestors.
    async fn check_links(&mut self, table: TableId, keys: &[i64]) -> Result<()> {
        let schema = self.schema;
        let bindings = Bindings::new();

        for owner in schema.chain(table) {
            for referrer in schema.referencing(owner.id) {
                for chunk in keys.chunks(CHUNK) {
                    let alias = alias(0, 0);
                    let column = Column::new(Some(&alias), &referrer.column);

                    let mut stmt = Select::new(
                        TableRef::new(&referrer.table, &alias),
                        Returning::Columns(vec![column]),
                    );
                    stmt.filter = vec![Fragment::column_in(
                        Some(&alias),
                        &referrer.column,
                        chunk.iter().map(|key| Value::I64(*key)),
                    )];
                    stmt.limit = Some(1);

                    let rows = self.query(stmt, &bindings, vec![Type::I64]).await?;

                    if let Some(key) = rows.first().and_then(|row| row.first()?.as_i64()) {
                        return Err(Error::link_constraint(
                            &owner.name,
                            key,
                            referrer.table,
                            referrer.column,
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Distinct non-null values of `column` in the rows of `table` whose
    /// `filter` column is one of `keys`.
    pub(super) async fn column_values(
        &mut self,
        table: &str,
        column: &str,
        filter: &str,
        keys: &[i64],
    ) -> Result<Vec<i64>> {
        let alias = alias(0, 0);
        let bindings = Bindings::new();
        let mut values = IndexSet::new();

        for chunk in keys.chunks(CHUNK) {
            let mut stmt = Select::new(
                TableRef::new(table, &alias),
                Returning::Columns(vec![Column::new(Some(&alias), column)]),
            );
            stmt.filter = vec![Fragment::column_in(
                Some(&alias),
                filter,
                chunk.iter().map(|key| Value::I64(*key)),
            )];

            let rows = self.query(stmt, &bindings, vec![Type::I64]).await?;
            values.extend(rows.iter().filter_map(|row| row.first()?.as_i64()));
        }

        Ok(values.into_iter().collect())
    }
}

fn key_in(column: &str, keys: &[i64]) -> Fragment {
    Fragment::column_in(None, column, keys.iter().map(|key| Value::I64(*key)))
}
