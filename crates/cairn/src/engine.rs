//! Runs builder requests against the connection.
//!
//! Every request holds the connection for its whole duration. Writes run
//! inside one transaction so a cascade either fully applies or leaves no
//! trace.

mod create;
mod delete;

mod include;
pub(crate) use include::Include;

mod select;
pub(crate) use select::Request;

mod update;

use crate::{LinkMode, Result};

use cairn_core::{
    driver::{
        operation::{Operation, Query, Transaction},
        Connection, Driver, Response,
    },
    schema::TableId,
    sql::{Insert, Select, Statement},
    stmt::{Bindings, Record, Row, Type},
    Schema,
};

use std::sync::Arc;
use tokio::sync::Mutex;

pub(crate) struct Engine {
    pub(crate) schema: Arc<Schema>,

    pub(crate) link_mode: LinkMode,

    driver: Box<dyn Driver>,

    connection: Mutex<Box<dyn Connection>>,
}

impl Engine {
    pub(crate) fn new(
        schema: Schema,
        driver: Box<dyn Driver>,
        connection: Box<dyn Connection>,
        link_mode: LinkMode,
    ) -> Self {
        Self {
            schema: Arc::new(schema),
            link_mode,
            driver,
            connection: Mutex::new(connection),
        }
    }

    pub(crate) async fn push_schema(&self) -> Result<()> {
        let mut connection = self.connection.lock().await;
        connection.push_schema(&self.schema).await?;

        tracing::info!(tables = self.schema.tables.len(), "pushed schema");
        Ok(())
    }

    pub(crate) async fn reset_db(&self) -> Result<()> {
        self.driver.reset_db().await
    }

    pub(crate) async fn query_from_builder(&self, request: &Request<'_>) -> Result<Vec<Record>> {
        let mut connection = self.connection.lock().await;
        Cx::new(&self.schema, &mut connection).select(request).await
    }

    pub(crate) async fn exist_from_builder(&self, request: &Request<'_>) -> Result<bool> {
        let mut connection = self.connection.lock().await;
        Cx::new(&self.schema, &mut connection).exists(request).await
    }

    /// Creates the entity in `record`, stored as `table`, and returns its key.
    pub(crate) async fn create_from_builder(
        &self,
        table: TableId,
        record: &mut Record,
    ) -> Result<i64> {
        let mut connection = self.connection.lock().await;
        let mut cx = Cx::new(&self.schema, &mut connection);

        cx.begin().await?;
        let res = cx.create(table, record).await;
        cx.end(res).await
    }

    pub(crate) async fn update_from_builder(
        &self,
        table: TableId,
        record: &mut Record,
    ) -> Result<()> {
        let mut connection = self.connection.lock().await;
        let mut cx = Cx::new(&self.schema, &mut connection);

        cx.begin().await?;
        let res = cx.update(table, record).await;
        cx.end(res).await
    }

    pub(crate) async fn delete_from_builder(&self, request: &Request<'_>) -> Result<u64> {
        let mut connection = self.connection.lock().await;
        let mut cx = Cx::new(&self.schema, &mut connection);

        cx.begin().await?;
        let res = cx.delete_matching(request).await;
        cx.end(res).await
    }
}

/// Execution context for one request.
pub(crate) struct Cx<'a> {
    schema: &'a Arc<Schema>,
    connection: &'a mut Box<dyn Connection>,
}

impl<'a> Cx<'a> {
    fn new(schema: &'a Arc<Schema>, connection: &'a mut Box<dyn Connection>) -> Self {
        Self { schema, connection }
    }

    async fn begin(&mut self) -> Result<()> {
        tracing::debug!("begin transaction");
        self.exec(Transaction::Start.into()).await?;
        Ok(())
    }

    /// Commits when `res` is a success and rolls back otherwise.
    async fn end<T>(&mut self, res: Result<T>) -> Result<T> {
        match res {
            Ok(value) => {
                self.exec(Transaction::Commit.into()).await?;
                tracing::debug!("committed transaction");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.exec(Transaction::Rollback.into()).await {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                tracing::debug!(error = %err, "rolled back transaction");
                Err(err)
            }
        }
    }

    async fn exec(&mut self, op: Operation) -> Result<Response> {
        self.connection.exec(self.schema, op).await
    }

    async fn query(
        &mut self,
        stmt: Select,
        bindings: &Bindings,
        ret: Vec<Type>,
    ) -> Result<Vec<Row>> {
        let query = Query::new(stmt).bindings(bindings.clone()).returning(ret);
        self.exec(Operation::Query(query)).await?.rows.into_values()
    }

    async fn execute(&mut self, stmt: impl Into<Statement>) -> Result<u64> {
        self.exec(Operation::Execute(Query::new(stmt)))
            .await?
            .rows
            .into_count()
    }

    /// Runs the insert and returns the generated key.
    async fn insert(&mut self, stmt: Insert) -> Result<i64> {
        self.exec(Operation::Insert(Query::new(stmt)))
            .await?
            .rows
            .into_generated_key()
    }
}
