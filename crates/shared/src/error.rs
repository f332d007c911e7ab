//! Application-wide error types.

use std::fmt;

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Broad classification of a failure, independent of the operation that raised it.
///
/// Callers decide how to react from the kind alone:
/// - `Validation` and `NotFound` are fixed by correcting the request
/// - `Conflict` means the caller must refetch current state before retrying
/// - `Referential` means some referencing data has to be resolved first
/// - `Unexpected` is an infrastructure failure; its transaction is already rolled back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty/too-long field, out-of-range count, malformed amounts.
    Validation,
    /// Duplicate code/title/number or stale version.
    Conflict,
    /// Referenced record does not exist.
    NotFound,
    /// Record is still referenced, or a reference rule was violated.
    Referential,
    /// Storage failure not otherwise classified.
    Unexpected,
}

impl ErrorKind {
    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Referential => 422,
            Self::Unexpected => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Conflict => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::Referential => "REFERENTIAL_ERROR",
            Self::Unexpected => "UNEXPECTED_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_code())
    }
}

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict (duplicate entry or outdated version).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Referential rule violation.
    #[error("Referential error: {0}")]
    Referential(String),

    /// Opaque failure; details are only ever logged.
    #[error("Something went wrong")]
    Unexpected,
}

impl AppError {
    /// Builds an error of the given kind carrying `message`.
    ///
    /// The message is discarded for `ErrorKind::Unexpected`.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        match kind {
            ErrorKind::Validation => Self::Validation(message.into()),
            ErrorKind::Conflict => Self::Conflict(message.into()),
            ErrorKind::NotFound => Self::NotFound(message.into()),
            ErrorKind::Referential => Self::Referential(message.into()),
            ErrorKind::Unexpected => Self::Unexpected,
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Referential(_) => ErrorKind::Referential,
            Self::Unexpected => ErrorKind::Unexpected,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.kind().error_code()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
