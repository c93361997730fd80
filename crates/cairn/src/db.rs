mod builder;
pub use builder::Builder;

mod connect;

use crate::{
    engine::Engine, CreateBuilder, DeleteBuilder, ExistBuilder, LinkMode, QueryBuilder, Result,
    Storable, UpdateBuilder,
};

use cairn_core::{schema::TableInfo, Schema};

use std::sync::Arc;

/// A database handle.
///
/// Cloning is cheap; clones share the schema and the connection. Every
/// builder works on its own copy of the handle.
#[derive(Clone)]
pub struct Db {
    engine: Arc<Engine>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.engine.schema
    }

    /// The table metadata for `M`.
    pub fn get_table_info<M: Storable>(&self) -> Result<&TableInfo> {
        self.schema().table_for::<M>()
    }

    pub fn query<M: Storable>(&self) -> QueryBuilder<M> {
        QueryBuilder::new(self.clone())
    }

    pub fn create<M: Storable>(&self) -> CreateBuilder<M> {
        CreateBuilder::new(self.clone())
    }

    pub fn exist<M: Storable>(&self) -> ExistBuilder<M> {
        ExistBuilder::new(self.clone())
    }

    pub fn update<M: Storable>(&self) -> UpdateBuilder<M> {
        UpdateBuilder::new(self.clone())
    }

    pub fn delete<M: Storable>(&self) -> DeleteBuilder<M> {
        DeleteBuilder::new(self.clone())
    }

    /// Creates the tables of every registered entity and their junction
    /// tables.
    pub async fn push_schema(&self) -> Result<()> {
        self.engine.push_schema().await
    }

    /// Drops all data. Does nothing for in-memory databases.
    pub async fn reset_db(&self) -> Result<()> {
        self.engine.reset_db().await
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    pub(crate) fn link_mode(&self) -> LinkMode {
        self.engine.link_mode
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("tables", &self.engine.schema.tables.len())
            .field("link_mode", &self.engine.link_mode)
            .finish()
    }
}
