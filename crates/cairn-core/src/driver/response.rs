use crate::{stmt::Row, Error, Result};

#[derive(Debug, Clone)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Rows returned by a query, in the statement's column order
    Values(Vec<Row>),

    /// Key generated by an insert
    GeneratedKey(i64),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn values(values: Vec<Row>) -> Self {
        Self {
            rows: Rows::Values(values),
        }
    }

    pub fn generated_key(key: i64) -> Self {
        Self {
            rows: Rows::GeneratedKey(key),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            rows => Err(Error::invalid_result(format!(
                "expected a row count; rows={rows:?}"
            ))),
        }
    }

    pub fn into_values(self) -> Result<Vec<Row>> {
        match self {
            Rows::Values(values) => Ok(values),
            rows => Err(Error::invalid_result(format!(
                "expected rows; rows={rows:?}"
            ))),
        }
    }

    pub fn into_generated_key(self) -> Result<i64> {
        match self {
            Rows::GeneratedKey(key) => Ok(key),
            rows => Err(Error::invalid_result(format!(
                "expected a generated key; rows={rows:?}"
            ))),
        }
    }
}
