//! Error types for the events layer.
use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};
use std::error::Error as StdError;
use std::fmt;

/// Errors surfaced by the subscription manager's client-facing API. Delivery
/// problems for individual sessions never show up here; those are handled by
/// pruning the affected session.
#[derive(Debug)]
pub struct Error {
    // Underlying error emitted from channel internals
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    // Enum representing which category of error
    pub error_kind: ErrorKind,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    // The manager task is no longer running; its mailbox is closed
    ManagerUnavailable,
    // A start-streaming token was redeemed by a session that did not mint it
    ForeignRegistration,
}

impl Error {
    pub(crate) fn manager_unavailable(source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
            error_kind: ErrorKind::ManagerUnavailable,
        }
    }

    pub fn foreign_registration() -> Self {
        Self {
            source: None,
            error_kind: ErrorKind::ForeignRegistration,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Events Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `events` layer to the `domain` layer.
impl From<Error> for DomainError {
    fn from(err: Error) -> Self {
        let error_kind = match err.error_kind {
            ErrorKind::ManagerUnavailable => {
                DomainErrorKind::Internal(InternalErrorKind::SubscriptionsUnavailable)
            }
            ErrorKind::ForeignRegistration => DomainErrorKind::Internal(InternalErrorKind::Other(
                "start-streaming was issued with another session's registration".to_string(),
            )),
        };

        DomainError {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
