use super::Error;

/// Error when a predicate expression cannot be represented in SQL.
///
/// The offending sub-expression is kept so callers can see exactly which
/// clause was rejected; a clause is never silently dropped.
#[derive(Debug)]
pub(super) struct TranslationError {
    message: Box<str>,
    expr: Box<str>,
}

impl std::error::Error for TranslationError {}

impl core::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "translation failed for `{}`: {}",
            self.expr, self.message
        )
    }
}

impl Error {
    /// Creates a translation error for the given sub-expression.
    pub fn translation(message: impl Into<String>, expr: impl core::fmt::Display) -> Error {
        Error::from(super::ErrorKind::Translation(TranslationError {
            message: message.into().into(),
            expr: expr.to_string().into(),
        }))
    }

    /// Returns `true` if this error is a translation error.
    pub fn is_translation(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::Translation(_)))
    }
}
