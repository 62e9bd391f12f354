//! Subscription plumbing between the twin backend and streaming transports.
//!
//! This crate owns the handshake a transport performs to receive change
//! events: register an outbound channel under a correlation id (connect),
//! then activate delivery (start streaming). Both signals travel through the
//! [`SubscriptionManager`]'s mailbox as fire-and-forget commands, while
//! published events fan out to the registered channels directly.
//!
//! # Architecture
//!
//! - **SubscriptionManager**: cloneable handle plus a background task draining
//!   the command mailbox
//! - **SessionRegistry**: shared map of registered session channels
//! - **Registration**: proof of a delivered connect signal, required to start
//!   streaming
//!
//! Events are carried as [`StreamItem`]s over bounded per-session channels,
//! so a slow consumer backpressures the publisher instead of growing an
//! unbounded queue.

use domain::{AuthorizationContext, CorrelationId, FieldSelector, ThingEvent, ThingId};
use std::collections::HashSet;
use std::fmt;

pub use error::{Error, ErrorKind};
pub use manager::{Registration, SubscriptionManager};
pub use registry::ConnectionId;

pub mod error;
pub mod filter;
pub mod manager;
pub mod registry;

/// Bounded capacity of each session's outbound item channel.
pub const SESSION_BUFFER_SIZE: usize = 10;

/// The classes of backend traffic a session can subscribe to. The SSE things
/// route only ever asks for `Events`; the other categories exist because the
/// subscription protocol is shared with richer transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingCategory {
    /// Persisted twin change notifications.
    Events,
    /// Application-level messages exchanged through things.
    Messages,
    /// Live commands passed through without persistence.
    LiveCommands,
    /// Live events passed through without persistence.
    LiveEvents,
}

/// One item flowing through a session's channel, in publish order.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamItem {
    Event(ThingEvent),
    /// Terminal: the subscription failed and the session should close after
    /// surfacing this to the client.
    Error(StreamError),
}

/// Errors raised by the subscription side and surfaced in-band on a session's
/// channel rather than as an HTTP response, since the response stream is
/// already underway when they occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The session's filter expression failed syntax validation.
    InvalidFilter { description: String },
}

impl StreamError {
    /// Stable machine-readable code for the error payload.
    pub fn code(&self) -> &'static str {
        match self {
            StreamError::InvalidFilter { .. } => "invalid-filter",
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StreamError::InvalidFilter { description } => {
                write!(f, "invalid filter expression: {description}")
            }
        }
    }
}

/// Everything a single accepted streaming request contributes to its session.
#[derive(Debug, Clone)]
pub struct SubscriptionRequest {
    pub category: StreamingCategory,
    pub correlation_id: CorrelationId,
    pub authorization: AuthorizationContext,
    /// Restrict delivery to these thing ids. `None` means no id filtering;
    /// an empty set matches nothing.
    pub id_allowlist: Option<HashSet<ThingId>>,
    pub field_selector: Option<FieldSelector>,
    /// Opaque filter expression forwarded to the backend for evaluation.
    pub filter: Option<String>,
}
