use super::{impl_filter_methods, Base};
use crate::{Db, Result, Storable};

/// Checks whether any entity of type `M` matches the filters, without
/// reading the rows.
pub struct ExistBuilder<M> {
    base: Base<M>,
}

impl<M: Storable> ExistBuilder<M> {
    pub(crate) fn new(db: Db) -> Self {
        Self { base: Base::new(db) }
    }

    /// Errors are logged and reported as `false`.
    pub async fn run(&self) -> bool {
        match self.run_with_error().await {
            Ok(exists) => exists,
            Err(err) => {
                tracing::warn!(error = %err, "existence check failed; returning false");
                false
            }
        }
    }

    pub async fn run_with_error(&self) -> Result<bool> {
        let request = self.base.request(Some(1))?;
        self.base.db().engine().exist_from_builder(&request).await
    }
}

impl_filter_methods!(ExistBuilder);
