use super::{create::checked_table, Base};
use crate::{Db, Result, Storable};

/// Saves changes to existing entities whose type is `M` or derives from it.
pub struct UpdateBuilder<M> {
    base: Base<M>,
}

impl<M: Storable> UpdateBuilder<M> {
    pub(crate) fn new(db: Db) -> Self {
        Self { base: Base::new(db) }
    }

    /// Errors are logged and `item` is returned unchanged.
    pub async fn run<U: Storable>(&self, mut item: U) -> U {
        if let Err(err) = self.save(&mut item).await {
            tracing::warn!(error = %err, "update failed; returning the item unchanged");
        }
        item
    }

    /// Writes every stored member of `item`. Related entities follow the
    /// member's cascade policy and loaded collections are reconciled with
    /// their junction table.
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
            .update_from_builder(table, &mut record)
            .await?;

        item.write_back(record)
    }
}
