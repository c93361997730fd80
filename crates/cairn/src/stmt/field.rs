use crate::Result;

use cairn_core::{
    err,
    stmt::{Record, Value},
    Error,
};

/// A type that can be stored in an entity member.
pub trait Field: Sized {
    /// Load the member from the value read from the database.
    fn load(value: Value) -> Result<Self>;

    /// The value stored for the member.
    fn to_value(&self) -> Value;
}

impl Field for bool {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            value => Err(Error::type_conversion(value, "bool")),
        }
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Field for i64 {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => Ok(v),
            value => Err(Error::type_conversion(value, "i64")),
        }
    }

    fn to_value(&self) -> Value {
        Value::I64(*self)
    }
}

impl Field for i32 {
    fn load(value: Value) -> Result<Self> {
        Ok(i64::load(value)?.try_into()?)
    }

    fn to_value(&self) -> Value {
        Value::I64(i64::from(*self))
    }
}

impl Field for f64 {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            value => Err(Error::type_conversion(value, "f64")),
        }
    }

    fn to_value(&self) -> Value {
        Value::F64(*self)
    }
}

impl Field for String {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            value => Err(Error::type_conversion(value, "String")),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: Field> Field for Option<T> {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::load(value).map(Some),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }
}

/// Typed access to the members of a [`Record`].
pub trait RecordExt {
    /// Removes the member `name` from the record and loads it as `T`.
    fn load<T: Field>(&mut self, name: &str) -> Result<T>;
}

impl RecordExt for Record {
    fn load<T: Field>(&mut self, name: &str) -> Result<T> {
        T::load(self.take(name)).map_err(|e| e.context(err!("loading member `{name}`")))
    }
}
