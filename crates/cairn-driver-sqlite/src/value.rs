use cairn_core::{
    stmt::{self, Type},
    Error, Result,
};
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

#[derive(Debug)]
pub struct Value(stmt::Value);

impl From<stmt::Value> for Value {
    fn from(value: stmt::Value) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core Cairn value.
    pub fn into_inner(self) -> stmt::Value {
        self.0
    }

    /// Converts a SQLite value within a row to a Cairn value of type `ty`.
    pub fn from_sql(row: &Row<'_>, index: usize, ty: Type) -> Result<Self> {
        let value: SqlValue = row.get(index).map_err(Error::driver)?;

        let core_value = match (value, ty) {
            (SqlValue::Null, _) => stmt::Value::Null,
            (SqlValue::Integer(value), Type::Bool) => stmt::Value::Bool(value != 0),
            (SqlValue::Integer(value), Type::I64) => stmt::Value::I64(value),
            (SqlValue::Integer(value), Type::F64) => stmt::Value::F64(value as f64),
            (SqlValue::Real(value), Type::F64) => stmt::Value::F64(value),
            (SqlValue::Text(value), Type::String) => stmt::Value::String(value),
            (value, ty) => {
                return Err(Error::invalid_result(format!(
                    "column {index} holds {value:?}, expected {ty}"
                )))
            }
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use stmt::Value;

        match &self.0 {
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            Value::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            Value::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            Value::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            value => Err(rusqlite::Error::ToSqlConversionFailure(
                format!("cannot bind {} as a SQLite parameter", value.variant_name()).into(),
            )),
        }
    }
}
