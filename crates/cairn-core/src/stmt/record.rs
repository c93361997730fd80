use super::Value;
use indexmap::IndexMap;
use std::fmt;

/// An entity's member values, keyed by member name.
///
/// Records are the untyped form entities take on their way to and from the
/// database. Nested entities are stored as [`Value::Record`], collections as
/// [`Value::List`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Returns the member's value, or null when the member is absent.
    pub fn value(&self, name: &str) -> &Value {
        const NULL: Value = Value::Null;
        self.fields.get(name).unwrap_or(&NULL)
    }

    /// Moves the member's value out, leaving null behind.
    pub fn take(&mut self, name: &str) -> Value {
        self.fields
            .get_mut(name)
            .map(Value::take)
            .unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (&name[..], value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads an integer key member. Null and zero both mean "not persisted".
    pub fn key(&self, name: &str) -> Option<i64> {
        match self.fields.get(name) {
            Some(Value::I64(id)) if *id != 0 => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        let mut s = "";
        for (name, value) in &self.fields {
            write!(f, "{s}{name}: {value}")?;
            s = ", ";
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
