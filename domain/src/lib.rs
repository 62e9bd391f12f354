//! Core vocabulary of the twin gateway.
//!
//! This crate models the things the gateway streams and everything a client
//! request contributes to a session: thing snapshots and their change events,
//! field selectors for projecting views, correlation ids, and the resolved
//! authorization context. It knows nothing about HTTP or about how events are
//! produced; upper crates wire those concerns around these types.

pub use auth::AuthorizationContext;
pub use correlation::CorrelationId;
pub use field_selector::{FieldPath, FieldSelector};
pub use thing::{Thing, ThingId, THING_ID_FIELD};
pub use thing_event::ThingEvent;

pub mod auth;
pub mod correlation;
pub mod error;
pub mod field_selector;
pub mod thing;
pub mod thing_event;
