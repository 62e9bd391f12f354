//! Web layer of the twin gateway.
//!
//! Everything HTTP lives here: route definitions, the OpenAPI description,
//! extractors that validate a request before it reaches a controller, and
//! the mapping from domain errors onto status codes. Controllers translate
//! between HTTP and the domain; they contain no streaming logic of their
//! own.

pub(crate) mod controller;
pub mod error;
pub(crate) mod extractors;
pub mod middleware;
pub(crate) mod params;
pub mod router;

pub use error::{Error, Result};
pub use service::AppState;
