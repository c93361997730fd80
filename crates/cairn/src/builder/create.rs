use super::Base;
use crate::{Db, Result, Storable};

use cairn_core::Error;

/// Inserts entities whose type is `M` or derives from it.
pub struct CreateBuilder<M> {
    base: Base<M>,
}

impl<M: Storable> CreateBuilder<M> {
    pub(crate) fn new(db: Db) -> Self {
        Self { base: Base::new(db) }
    }

    /// Creates `item`. Errors are logged and `item` is returned unchanged.
    pub async fn run<U: Storable>(&self, mut item: U) -> U {
        if let Err(err) = self.save(&mut item).await {
            tracing::warn!(error = %err, "create failed; returning the item unchanged");
        }
        item
    }

    /// Creates `item` and returns it with its generated key, along with the
    /// keys of related entities created with it.
    ///
    /// `item` is stored as its own type: a `Cat` created through
    /// `create::<Animal>()` gets rows in both tables.
    pub async fn run_with_error<U: Storable>(&self, mut item: U) -> Result<U> {
        self.save(&mut item).await?;
        Ok(item)
    }

    async fn save<U: Storable>(&self, item: &mut U) -> Result<()> {
        let table = checked_table::<M, U>(&self.base)?;

        let mut record = item.to_record();
        self.base
            .db()
            .engine()
            .create_from_builder(table, &mut record)
            .await?;

        item.write_back(record)
    }
}

/// The table of `U`, which must be `M` or derive from it.
pub(super) fn checked_table<M: Storable, U: Storable>(
    base: &Base<M>,
) -> Result<cairn_core::schema::TableId> {
    let root = base.table()?;
    let schema = base.db().schema();
    let table = schema.table_for::<U>()?;

    if !schema.is_a(table.id, root) {
        return Err(Error::invalid_statement(format!(
            "`{}` is not a `{}`",
            table.type_name,
            schema.table(root).type_name
        )));
    }

    Ok(table.id)
}
