use crate::{Field, Result, Storable};

use cairn_core::{stmt::Value, Error};

use std::fmt;

/// A single reference to another entity.
///
/// Queries return references as short links (`Ref::Id`) unless the member was
/// included or the query loads full links.
pub enum Ref<T> {
    /// No related entity. Stored as `NULL`.
    Unset,

    /// Short link: only the related entity's key is known.
    Id(i64),

    /// The related entity itself. It may not be saved yet.
    Loaded(Box<T>),
}

impl<T: Storable> Ref<T> {
    pub fn new(value: T) -> Self {
        Self::Loaded(Box::new(value))
    }

    /// The related entity's key, if it has one.
    pub fn id(&self) -> Option<i64> {
        match self {
            Self::Unset => None,
            Self::Id(id) => Some(*id),
            Self::Loaded(value) => value.id(),
        }
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

impl<T: Storable> Field for Ref<T> {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Unset),
            Value::I64(id) => Ok(Self::Id(id)),
            Value::Record(record) => Ok(Self::new(T::load(record)?)),
            value => Err(Error::type_conversion(value, "Ref")),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Unset => Value::Null,
            Self::Id(id) => Value::I64(*id),
            Self::Loaded(value) => Value::Record(value.to_record()),
        }
    }
}

impl<T> Default for Ref<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> From<T> for Ref<T> {
    fn from(value: T) -> Self {
        Self::Loaded(Box::new(value))
    }
}

impl<T: fmt::Debug> fmt::Debug for Ref<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(fmt, "<unset>"),
            Self::Id(id) => write!(fmt, "<ref {id}>"),
            Self::Loaded(value) => value.fmt(fmt),
        }
    }
}

impl<T: Clone> Clone for Ref<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Unset => Self::Unset,
            Self::Id(id) => Self::Id(*id),
            Self::Loaded(value) => Self::Loaded(value.clone()),
        }
    }
}

impl<T: PartialEq> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unset, Self::Unset) => true,
            (Self::Id(lhs), Self::Id(rhs)) => lhs == rhs,
            (Self::Loaded(lhs), Self::Loaded(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}
