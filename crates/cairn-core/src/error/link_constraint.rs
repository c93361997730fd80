use super::Error;

/// Error when a row cannot be deleted because another row still links to it
/// through a reference or junction table that does not cascade the delete.
#[derive(Debug)]
pub(super) struct LinkConstraint {
    table: Box<str>,
    key: i64,
    referencing_table: Box<str>,
    referencing_column: Box<str>,
}

impl std::error::Error for LinkConstraint {}

impl core::fmt::Display for LinkConstraint {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot delete `{}` row {}: still referenced by `{}`.`{}`",
            self.table, self.key, self.referencing_table, self.referencing_column
        )
    }
}

impl Error {
    /// Creates a link constraint error.
    pub fn link_constraint(
        table: impl Into<String>,
        key: i64,
        referencing_table: impl Into<String>,
        referencing_column: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::LinkConstraint(LinkConstraint {
            table: table.into().into(),
            key,
            referencing_table: referencing_table.into().into(),
            referencing_column: referencing_column.into().into(),
        }))
    }

    /// Returns `true` if this error is a link constraint error.
    pub fn is_link_constraint(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::LinkConstraint(_)))
    }
}
