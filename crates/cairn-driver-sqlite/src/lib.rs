mod value;
pub(crate) use value::Value;

use cairn_core::{
    async_trait,
    driver::{
        operation::{Operation, Query},
        Capability, Driver, Response,
    },
    stmt, Error, Result, Schema,
};
use cairn_sql::{self as sql, ddl};
use rusqlite::Connection as RusqliteConnection;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver from a connection URL such as
    /// `sqlite::memory:` or `sqlite:/tmp/app.db`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            return Err(cairn_core::err!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            ));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn cairn_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }

    async fn reset_db(&self) -> Result<()> {
        if let Sqlite::File(path) = self {
            if path.exists() {
                std::fs::remove_file(path).map_err(Error::driver)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
    serializer: sql::Serializer,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::driver)?;
        Self::configure(connection)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver)?;
        Self::configure(connection)
    }

    fn configure(connection: RusqliteConnection) -> Result<Self> {
        // SQLite leaves REFERENCES constraints unchecked unless asked
        connection
            .pragma_update(None, "foreign_keys", "ON")
            .map_err(Error::driver)?;

        Ok(Self {
            connection,
            serializer: sql::Serializer::sqlite(),
        })
    }

    fn execute_sql(&self, sql: &str) -> Result<()> {
        tracing::debug!(db.statement = sql, "executing");
        self.connection.execute(sql, []).map_err(Error::driver)?;
        Ok(())
    }

    fn prepare(&self, query: &Query) -> Result<(String, Vec<Value>)> {
        let mut params = Vec::<stmt::Value>::new();
        let sql = self
            .serializer
            .serialize(&query.stmt, &query.bindings, &mut params)?;

        tracing::debug!(db.statement = %sql, params = ?params, "executing");

        Ok((sql, params.into_iter().map(Value::from).collect()))
    }

    fn query(&self, query: Query) -> Result<Response> {
        let Some(ret) = &query.ret else {
            return Err(Error::invalid_statement(
                "a query must declare the types of its returned columns",
            ));
        };

        let (sql, params) = self.prepare(&query)?;

        let mut stmt = self.connection.prepare_cached(&sql).map_err(Error::driver)?;
        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;

        let mut values = vec![];

        while let Some(row) = rows.next().map_err(Error::driver)? {
            let mut items = Vec::with_capacity(ret.len());

            for (index, ty) in ret.iter().enumerate() {
                items.push(Value::from_sql(row, index, *ty)?.into_inner());
            }

            values.push(items);
        }

        Ok(Response::values(values))
    }

    fn execute(&self, query: Query) -> Result<u64> {
        let (sql, params) = self.prepare(&query)?;

        let mut stmt = self.connection.prepare_cached(&sql).map_err(Error::driver)?;
        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;

        Ok(count as u64)
    }
}

#[async_trait]
impl cairn_core::driver::Connection for Connection {
    async fn exec(&mut self, _schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        match op {
            Operation::Query(query) => self.query(query),
            Operation::Execute(query) => Ok(Response::count(self.execute(query)?)),
            Operation::Insert(query) => {
                self.execute(query)?;
                Ok(Response::generated_key(self.connection.last_insert_rowid()))
            }
            Operation::Transaction(op) => {
                self.execute_sql(self.serializer.serialize_transaction(&op))?;
                Ok(Response::count(0))
            }
        }
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        for stmt in ddl::schema_statements(schema) {
            let mut params = Vec::<stmt::Value>::new();
            let sql = self
                .serializer
                .serialize(&stmt, &stmt::Bindings::new(), &mut params)?;
            assert!(params.is_empty(), "DDL statements take no parameters");

            self.execute_sql(&sql)?;
        }

        Ok(())
    }
}
