use super::{connect, Db};
use crate::{engine::Engine, LinkMode, Result, Storable};

use cairn_core::{driver::Driver, schema};

use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,

    link_mode: LinkMode,
}

impl Builder {
    pub fn register<M: Storable>(&mut self) -> &mut Self {
        self.core.register::<M>();
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.core.table_name_prefix(prefix);
        self
    }

    /// Overrides the identifier length limit used to shorten junction table
    /// names. Defaults to the driver's limit.
    pub fn max_identifier_length(&mut self, len: usize) -> &mut Self {
        self.core.max_identifier_length(len);
        self
    }

    /// Default link mode for builders created from the handle.
    pub fn link_mode(&mut self, link_mode: LinkMode) -> &mut Self {
        self.link_mode = link_mode;
        self
    }

    /// Connects to the database at `url`, picking the driver from its scheme.
    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build_with(connect::driver(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        self.build_with(Box::new(driver)).await
    }

    async fn build_with(&mut self, driver: Box<dyn Driver>) -> Result<Db> {
        let schema = self.core.build(driver.capability())?;
        let connection = driver.connect().await?;

        Ok(Db {
            engine: Arc::new(Engine::new(schema, driver, connection, self.link_mode)),
        })
    }
}
