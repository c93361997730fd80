use crate::Result;

use cairn_core::{schema::Describe, stmt::Record};

/// An entity type stored in its own table.
///
/// Records exchanged with the engine are keyed by member name and hold the
/// key under the table's key name. References hold `Null`, the related key,
/// or the related entity as a nested record. Collections hold `Null` when they
/// were not loaded and a list of nested records otherwise.
pub trait Storable: Describe + Send + Sync + Sized {
    /// The key, or `None` when the entity has not been saved.
    fn id(&self) -> Option<i64>;

    /// Load an instance of the entity, populating members from the record.
    fn load(record: Record) -> Result<Self>;

    /// The persisted members of the entity as a record.
    fn to_record(&self) -> Record;

    /// Applies the record produced by a save (generated keys, created related
    /// entities) to `self`.
    ///
    /// The default reloads `self` from the record, which resets members that
    /// are not stored in the database. Types with `not_in_db` members should
    /// override it and keep those members.
    fn write_back(&mut self, record: Record) -> Result<()> {
        *self = Self::load(record)?;
        Ok(())
    }
}
