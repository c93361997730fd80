use super::Value;
use std::fmt;

/// The storage type of a scalar column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 64-bit integer. Narrower integers are widened to this type.
    I64,

    /// 64-bit floating point number
    F64,

    /// String type
    String,
}

impl Type {
    /// The value a member of this type holds when it was not loaded.
    pub fn default_value(self) -> Value {
        match self {
            Type::Bool => Value::Bool(false),
            Type::I64 => Value::I64(0),
            Type::F64 => Value::F64(0.0),
            Type::String => Value::String(String::new()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Bool => "bool",
            Type::I64 => "i64",
            Type::F64 => "f64",
            Type::String => "string",
        })
    }
}
