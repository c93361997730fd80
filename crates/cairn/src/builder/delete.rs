use super::{impl_filter_methods, Base};
use crate::{Db, Result, Storable};

use cairn_core::Error;

/// Deletes entities of type `M`, following `auto_delete` and `auto_crud`
/// cascades.
///
/// A row that is still referenced by a member without a delete cascade is
/// not deleted; the whole call fails with a link constraint error.
pub struct DeleteBuilder<M> {
    base: Base<M>,
}

impl<M: Storable> DeleteBuilder<M> {
    pub(crate) fn new(db: Db) -> Self {
        Self { base: Base::new(db) }
    }

    /// Restricts the delete to `item`.
    pub fn item<U: Storable>(&mut self, item: &U) -> &mut Self {
        match item.id() {
            Some(key) => self.base.filter_key(key),
            None => self.base.push_error(Error::invalid_statement(
                "cannot delete an entity that was never saved",
            )),
        }
        self
    }

    /// Errors are logged and reported as `false`.
    pub async fn run(&self) -> bool {
        match self.run_with_error().await {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "delete failed");
                false
            }
        }
    }

    /// Deletes every matching entity and returns how many were deleted.
    pub async fn run_with_error(&self) -> Result<u64> {
        let request = self.base.request(None)?;
        self.base.db().engine().delete_from_builder(&request).await
    }
}

impl_filter_methods!(DeleteBuilder);
