//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the domain layer are modeled as a tree structure with
/// `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer
/// or in lower layers. The `source` field is used to hold the original error
/// that caused the domain error. The intent is to translate errors between
/// layers while maintaining layer boundaries: `events` converts its errors
/// into this type, and `web` maps the various `error_kind`s to appropriate
/// HTTP status codes without depending on `events` error types directly.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Request(RequestErrorKind),
    Internal(InternalErrorKind),
}

/// Enum representing errors caused by what the client asked for.
#[derive(Debug, PartialEq)]
pub enum RequestErrorKind {
    /// The `fields` parameter could not be parsed into a field selector.
    InvalidFieldSelector(String),
}

/// Enum representing errors originating inside the gateway itself.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// The event-producing subsystem is not reachable; no session can start.
    SubscriptionsUnavailable,
    Other(String),
}

impl Error {
    pub fn invalid_field_selector(description: impl Into<String>) -> Self {
        Self {
            source: None,
            error_kind: DomainErrorKind::Request(RequestErrorKind::InvalidFieldSelector(
                description.into(),
            )),
        }
    }

    pub fn internal(description: impl Into<String>) -> Self {
        Self {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(description.into())),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_map_to_their_kinds() {
        let err = Error::invalid_field_selector("bad path");
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Request(RequestErrorKind::InvalidFieldSelector(
                "bad path".to_string()
            ))
        );

        let err = Error::internal("boom");
        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Other("boom".to_string()))
        );
    }
}
