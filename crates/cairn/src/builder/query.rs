use super::{impl_filter_methods, Base};
use crate::{stmt::Path, Db, Result, Storable};

/// Reads entities of type `M`.
pub struct QueryBuilder<M> {
    base: Base<M>,
}

impl<M: Storable> QueryBuilder<M> {
    pub(crate) fn new(db: Db) -> Self {
        Self { base: Base::new(db) }
    }

    /// Reads only `path` (and the key); other members keep their defaults.
    pub fn field_generic<T>(&mut self, path: Path<M, T>) -> &mut Self {
        self.base.field_generic(path);
        self
    }

    pub fn include_generic<T>(&mut self, path: Path<M, T>) -> &mut Self {
        self.base.include_generic(path);
        self
    }

    pub fn short_link(&mut self, short: bool) -> &mut Self {
        self.base.short_link(short);
        self
    }

    /// Runs the query. Errors are logged and produce an empty list.
    pub async fn run(&self) -> Vec<M> {
        match self.run_with_error().await {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(error = %err, "query failed; returning no rows");
                vec![]
            }
        }
    }

    pub async fn run_with_error(&self) -> Result<Vec<M>> {
        self.load(None).await
    }

    /// The first matching entity in key order.
    pub async fn first(&self) -> Result<Option<M>> {
        Ok(self.load(Some(1)).await?.into_iter().next())
    }

    async fn load(&self, limit: Option<u64>) -> Result<Vec<M>> {
        let request = self.base.request(limit)?;
        let records = self.base.db().engine().query_from_builder(&request).await?;
        records.into_iter().map(M::load).collect()
    }
}

impl_filter_methods!(QueryBuilder);
