//! Server-Sent Events (SSE) session infrastructure for the things stream.
//!
//! This crate turns the raw item sequence a session receives from the
//! subscription side into the frame sequence that goes on the wire, and owns
//! the session lifecycle around it.
//!
//! # Architecture
//!
//! - **One session per response**: Each accepted streaming request creates a
//!   [`Session`] that registers its own bounded channel with the backend and
//!   deregisters on every exit path, including client disconnects.
//! - **Consumer-side pipeline**: Filtering and projection happen in
//!   [`EventPipeline`] after the channel, so the backend stays unaware of
//!   per-session query parameters other than the forwarded filter.
//! - **Ephemeral frames**: Nothing is buffered beyond the session channel; a
//!   client that connects late simply starts with the next event.
//! - **Heartbeats**: [`with_heartbeat`] keeps quiet streams alive through
//!   proxies by emitting comment frames, leaving data frame timing untouched.
//!
//! # Frame Flow
//!
//! 1. The handler registers a session channel (connect, then start streaming)
//! 2. Published change events land in the channel in publish order
//! 3. The pipeline drops or projects each event into an [`SseFrame`]
//! 4. The heartbeat adapter fills silent periods with comment frames
//! 5. Frames are encoded as `axum` SSE events and written to the response
//!
//! # Modules
//!
//! - `frame`: frame variants and their wire encoding
//! - `keep_alive`: heartbeat injection for quiet streams
//! - `pipeline`: per-session filter and projection chain
//! - `session`: session lifecycle and teardown guarantees

pub mod frame;
pub mod keep_alive;
pub mod pipeline;
pub mod session;

pub use frame::SseFrame;
pub use keep_alive::{with_heartbeat, HEARTBEAT_INTERVAL};
pub use pipeline::EventPipeline;
pub use session::{Session, SessionState};
