//! Domain errors for the music catalog.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Caller-facing error classification.
///
/// Every [`DomainError`] collapses into exactly one of these, which is what
/// clients see as the error `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    BadInput,
    /// Referenced or queried entity absent, including zero-match index queries.
    NotFound,
    /// Unacknowledged store write, unresolved foreign key, unexpected read failure.
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadInput => "BAD_USER_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Domain-level errors that can occur in the catalog.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    ValidationFailed(String),

    #[error("Artist not found: {0}")]
    ArtistNotFound(Uuid),

    #[error("Album not found: {0}")]
    AlbumNotFound(Uuid),

    #[error("Record company not found: {0}")]
    RecordCompanyNotFound(Uuid),

    #[error("{0}")]
    NoMatches(String),

    #[error("Could not find {entity} {id}")]
    UnresolvedReference { entity: &'static str, id: Uuid },

    #[error("Write was not acknowledged: {0}")]
    WriteFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DomainError {
    /// Shorthand for a validation failure on a named field.
    pub fn invalid(field: &str) -> Self {
        Self::ValidationFailed(format!("{field} is invalid"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationFailed(_) => ErrorKind::BadInput,
            Self::ArtistNotFound(_)
            | Self::AlbumNotFound(_)
            | Self::RecordCompanyNotFound(_)
            | Self::NoMatches(_) => ErrorKind::NotFound,
            Self::UnresolvedReference { .. }
            | Self::WriteFailed(_)
            | Self::DatabaseError(_)
            | Self::SerializationError(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(DomainError::invalid("Title").kind(), ErrorKind::BadInput);
        assert_eq!(DomainError::ArtistNotFound(Uuid::nil()).kind(), ErrorKind::NotFound);
        assert_eq!(DomainError::NoMatches("none".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            DomainError::UnresolvedReference { entity: "Artist", id: Uuid::nil() }.kind(),
            ErrorKind::Internal
        );
        assert_eq!(DomainError::WriteFailed("x".into()).code(), "INTERNAL_SERVER_ERROR");
    }

    #[test]
    fn test_invalid_message() {
        assert_eq!(DomainError::invalid("Artist Name").to_string(), "Artist Name is invalid");
    }
}
