use crate::{Field, Result, Storable};

use cairn_core::{stmt::Value, Error};

use std::fmt;

/// A collection of related entities linked through a junction table.
///
/// Collections are only read when the query includes them. A collection that
/// was not loaded is left untouched when its owner is saved.
pub struct Many<T> {
    items: Vec<T>,
    loaded: bool,
}

impl<T> Many<T> {
    /// An empty, loaded collection. Saving the owner links nothing.
    pub fn new() -> Self {
        Self {
            items: vec![],
            loaded: true,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The related entities. Empty when the collection was not loaded.
    pub fn get(&self) -> &[T] {
        &self.items
    }

    /// Mutable access marks the collection as loaded: the owner's next save
    /// links exactly these entities.
    pub fn get_mut(&mut self) -> &mut Vec<T> {
        self.loaded = true;
        &mut self.items
    }

    pub fn push(&mut self, item: T) {
        self.get_mut().push(item);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Storable> Field for Many<T> {
    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self {
                items: vec![],
                loaded: false,
            }),
            Value::List(values) => {
                let items = values
                    .into_iter()
                    .map(|value| match value {
                        Value::Record(record) => T::load(record),
                        value => Err(Error::type_conversion(value, "Many")),
                    })
                    .collect::<Result<_>>()?;

                Ok(Self {
                    items,
                    loaded: true,
                })
            }
            value => Err(Error::type_conversion(value, "Many")),
        }
    }

    fn to_value(&self) -> Value {
        if !self.loaded {
            return Value::Null;
        }

        Value::List(
            self.items
                .iter()
                .map(|item| Value::Record(item.to_record()))
                .collect(),
        )
    }
}

impl<T> Default for Many<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for Many<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            loaded: true,
        }
    }
}

impl<'a, T> IntoIterator for &'a Many<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Many<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.loaded {
            self.items.fmt(fmt)
        } else {
            write!(fmt, "<not loaded>")
        }
    }
}

impl<T: Clone> Clone for Many<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            loaded: self.loaded,
        }
    }
}

impl<T: PartialEq> PartialEq for Many<T> {
    fn eq(&self, other: &Self) -> bool {
        self.loaded == other.loaded && self.items == other.items
    }
}
