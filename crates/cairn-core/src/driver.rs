mod capability;
pub use capability::{Capability, Flavor};

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, Schema};

use std::{fmt::Debug, sync::Arc};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes the driver's capability, which informs statement generation.
    fn capability(&self) -> &'static Capability;

    /// Opens a new connection to the database.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;

    /// Drops all data. Drivers for ephemeral databases have nothing to do.
    async fn reset_db(&self) -> crate::Result<()> {
        Ok(())
    }
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, schema: &Arc<Schema>, op: Operation) -> crate::Result<Response>;

    /// Create every table (including junction tables) described by the schema.
    async fn push_schema(&mut self, schema: &Schema) -> crate::Result<()>;
}
