use super::{create::column_value, Cx};
use crate::Result;

use async_recursion::async_recursion;
use cairn_core::{
    schema::TableId,
    sql::{Fragment, Update},
    stmt::{Record, Value},
    Error,
};

impl Cx<'_> {
    /// Writes every stored member of `record`, an existing entity of `table`.
    #[async_recursion]
    pub(super) async fn update(&mut self, table: TableId, record: &mut Record) -> Result<()> {
        let schema = self.schema;
        let info = schema.table(table);

        let Some(key) = record.key(&info.key) else {
            return Err(Error::invalid_statement(format!(
                "cannot update a `{}` that was never saved",
                info.type_name
            )));
        };

        self.save_references(table, record, true).await?;

        let mut written = false;

        for owner in schema.chain(table) {
            let assignments: Vec<(String, Value)> = owner
                .members
                .iter()
                .filter_map(|member| {
                    let column = member.column()?;
                    Some((column.to_string(), column_value(schema, member, record)))
                })
                .collect();

            if assignments.is_empty() {
                continue;
            }

            let count = self
                .execute(Update {
                    table: owner.name.clone(),
                    assignments,
                    filter: vec![Fragment::column_eq(None, &owner.key, key)],
                })
                .await?;

            if count == 0 {
                return Err(Error::record_not_found(format!(
                    "table={} key={key}",
                    owner.name
                )));
            }

            written = true;
        }

        // No stored members; the row still has to exist
        if !written {
            let rows = self.column_values(&info.name, &info.key, &info.key, &[key]).await?;
            if rows.is_empty() {
                return Err(Error::record_not_found(format!(
                    "table={} key={key}",
                    info.name
                )));
            }
        }

        self.link_collections(table, key, record, true).await?;

        tracing::debug!(table = %info.name, key, "updated entity");
        Ok(())
    }
}
