use super::Error;

/// Error when a type cannot be mapped to tables.
///
/// This occurs when:
/// - A descriptor has no key member
/// - Two members of a table (or of its ancestors) map to the same column
/// - A member is declared with more than one relationship kind
/// - A referenced type resolves to a different descriptor than expected
/// - The `extends` chain loops back on itself
///
/// These errors are raised while the schema registry is built.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)))
    }
}
