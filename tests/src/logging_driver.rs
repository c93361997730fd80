use cairn_core::{
    async_trait,
    driver::{Capability, Connection, Driver, Operation, Response},
    stmt,
    Result, Schema,
};
use cairn_sql::Serializer;

use std::sync::{Arc, Mutex};

#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Log of all operations executed through this driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            inner: driver,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect().await?,
            serializer: Serializer::new(self.inner.capability().flavor),
            ops_log: self.ops_log_handle(),
        }))
    }

    async fn reset_db(&self) -> Result<()> {
        self.inner.reset_db().await
    }
}

/// One operation that reached the database, with the SQL it ran as.
#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,
    pub sql: String,
    pub response: Response,
}

/// A connection wrapper that logs all successful operations
#[derive(Debug)]
pub struct LoggingConnection {
    inner: Box<dyn Connection>,

    /// Renders logged statements as SQL text
    serializer: Serializer,

    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl LoggingConnection {
    fn render(&self, operation: &Operation) -> Result<String> {
        Ok(match operation {
            Operation::Transaction(op) => self.serializer.serialize_transaction(op).to_string(),
            Operation::Query(query) | Operation::Execute(query) | Operation::Insert(query) => {
                let mut params = Vec::<stmt::Value>::new();
                self.serializer
                    .serialize(&query.stmt, &query.bindings, &mut params)?
            }
        })
    }
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn exec(&mut self, schema: &Arc<Schema>, operation: Operation) -> Result<Response> {
        let sql = self.render(&operation)?;
        let response = self.inner.exec(schema, operation.clone()).await?;

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operation,
                sql,
                response: response.clone(),
            });

        Ok(response)
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        self.inner.push_schema(schema).await
    }
}
