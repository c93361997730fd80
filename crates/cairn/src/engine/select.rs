use super::{Cx, Include};
use crate::{LinkMode, Result};

use cairn_core::{
    schema::{TableId, TableMemberInfo},
    sql::{Column, Fragment, Returning, Select},
    stmt::{Bindings, Record, Type, Value},
};
use cairn_sql::{column_for, from_chain};

/// What a query or exist builder asks of the engine.
pub(crate) struct Request<'a> {
    pub(crate) table: TableId,

    /// Translated filters, combined with `AND`
    pub(crate) filters: &'a [Fragment],

    pub(crate) bindings: &'a Bindings,

    /// Selected members. `None` selects every member.
    pub(crate) fields: Option<&'a [String]>,

    pub(crate) include: &'a Include,

    pub(crate) link_mode: LinkMode,

    pub(crate) limit: Option<u64>,
}

/// Rows of one table, selected by filters.
struct Read<'a> {
    table: TableId,
    filters: Vec<Fragment>,
    bindings: &'a Bindings,
    fields: Option<&'a [String]>,
    include: &'a Include,
    limit: Option<u64>,
}

impl Read<'_> {
    /// The key is always projected, and so are included members.
    fn projects(&self, member: &TableMemberInfo) -> bool {
        member.column().is_some()
            && match self.fields {
                None => true,
                Some(fields) => {
                    fields.contains(&member.name) || self.include.contains(&member.name)
                }
            }
    }
}

/// Largest number of keys bound in one `IN` list.
pub(super) const CHUNK: usize = 500;

impl Cx<'_> {
    pub(super) async fn select(&mut self, request: &Request<'_>) -> Result<Vec<Record>> {
        let include = match request.link_mode {
            LinkMode::Short => request.include.clone(),
            LinkMode::Full => request.include.clone().with_relations(self.schema, request.table),
        };

        let mut records = self
            .read(Read {
                table: request.table,
                filters: request.filters.to_vec(),
                bindings: request.bindings,
                fields: request.fields,
                include: &include,
                limit: request.limit,
            })
            .await?;

        self.include(request.table, &mut records, &include).await?;
        Ok(records)
    }

    pub(super) async fn exists(&mut self, request: &Request<'_>) -> Result<bool> {
        let (from, joins) = from_chain(self.schema, request.table, 0);

        let mut stmt = Select::new(from, Returning::One);
        stmt.joins = joins;
        stmt.filter = request.filters.to_vec();
        stmt.limit = Some(1);

        let rows = self.query(stmt, request.bindings, vec![Type::I64]).await?;
        Ok(!rows.is_empty())
    }

    /// Keys of the rows matched by the request, in key order.
    pub(super) async fn select_keys(&mut self, request: &Request<'_>) -> Result<Vec<i64>> {
        let schema = self.schema;
        let (from, joins) = from_chain(schema, request.table, 0);
        let key = Column::new(Some(&from.alias), &schema.table(request.table).key);

        let mut stmt = Select::new(from, Returning::Columns(vec![key.clone()]));
        stmt.joins = joins;
        stmt.filter = request.filters.to_vec();
        stmt.order_by = Some(key);
        stmt.limit = request.limit;

        let rows = self.query(stmt, request.bindings, vec![Type::I64]).await?;
        Ok(rows.iter().filter_map(|row| row.first()?.as_i64()).collect())
    }

    /// Loads the entities stored under `keys`, with `include` applied. Keys
    /// without a row are skipped.
    pub(super) async fn load_keys(
        &mut self,
        table: TableId,
        keys: &[i64],
        include: &Include,
    ) -> Result<Vec<Record>> {
        let key = &self.schema.table(table).key;
        let alias = cairn_core::sql::alias(0, 0);
        let bindings = Bindings::new();
        let mut records = vec![];

        for chunk in keys.chunks(CHUNK) {
            let values = chunk.iter().map(|id| Value::I64(*id));
            let filter = Fragment::column_in(Some(&alias), key, values);

            records.extend(
                self.read(Read {
                    table,
                    filters: vec![filter],
                    bindings: &bindings,
                    fields: None,
                    include,
                    limit: None,
                })
                .await?,
            );
        }

        self.include(table, &mut records, include).await?;
        Ok(records)
    }

    async fn read(&mut self, mut read: Read<'_>) -> Result<Vec<Record>> {
        let schema = self.schema;
        let info = schema.table(read.table);
        let members = schema.all_members(read.table);

        let (from, joins) = from_chain(schema, read.table, 0);
        let key = Column::new(Some(&from.alias), &info.key);

        let mut columns = vec![key.clone()];
        let mut ret = vec![Type::I64];

        for (_, member) in &members {
            if !read.projects(member) {
                continue;
            }

            let (Some((column, _)), Some(ty)) =
                (column_for(schema, read.table, 0, &member.name), member.ty())
            else {
                continue;
            };

            columns.push(column);
            ret.push(ty);
        }

        let mut stmt = Select::new(from, Returning::Columns(columns));
        stmt.joins = joins;
        stmt.filter = std::mem::take(&mut read.filters);
        stmt.order_by = Some(key);
        stmt.limit = read.limit;

        let rows = self.query(stmt, read.bindings, ret).await?;

        let records = rows
            .into_iter()
            .map(|row| {
                let mut values = row.into_iter();
                let mut record = Record::new();
                record.insert(&info.key, values.next().unwrap_or_default());

                for (_, member) in &members {
                    let value = if read.projects(member) {
                        values.next().unwrap_or_default()
                    } else {
                        member.default_value()
                    };
                    record.insert(&member.name, value);
                }

                record
            })
            .collect();

        Ok(records)
    }
}
