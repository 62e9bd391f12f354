//! Lifecycle of one streaming session.

use domain::{AuthorizationContext, CorrelationId};
use events::{ConnectionId, Error, Registration, StreamItem, StreamingCategory, SubscriptionManager};
use log::*;
use tokio::sync::mpsc;

/// Lifecycle states of a streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet registered with the backend.
    Idle,
    /// Connect has been sent; delivery not yet activated.
    Handshaking,
    /// Items are flowing.
    Streaming,
    /// Deregistered; terminal.
    Closed,
}

/// One client's streaming session with the twin backend.
///
/// The session owns the handshake (connect, then start streaming) and
/// guarantees deregistration on every exit path: [`Session::close`] is
/// idempotent, and dropping an unclosed session closes it. A client that
/// disconnects mid-stream therefore still tears its registration down when
/// the response stream holding the session goes away.
pub struct Session {
    correlation_id: CorrelationId,
    subscriptions: SubscriptionManager,
    connection_id: Option<ConnectionId>,
    state: SessionState,
}

impl Session {
    pub fn new(subscriptions: SubscriptionManager, correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            subscriptions,
            connection_id: None,
            state: SessionState::Idle,
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Register the session's outbound channel with the backend.
    pub fn connect(
        &mut self,
        sender: mpsc::Sender<StreamItem>,
        category: StreamingCategory,
    ) -> Result<Registration, Error> {
        let registration =
            self.subscriptions
                .connect(sender, self.correlation_id.clone(), category)?;
        self.connection_id = Some(registration.connection_id().clone());
        self.transition(SessionState::Handshaking);
        Ok(registration)
    }

    /// Activate delivery for a connected session.
    ///
    /// Only redeems the registration this session's own [`Session::connect`]
    /// produced. A token minted elsewhere would activate a different
    /// registration while this session merely believed itself streaming, so
    /// it is refused and dropped.
    pub fn start_streaming(
        &mut self,
        registration: Registration,
        authorization: AuthorizationContext,
        filter: Option<String>,
    ) -> Result<(), Error> {
        if self.connection_id.as_ref() != Some(registration.connection_id()) {
            return Err(Error::foreign_registration());
        }
        registration.start_streaming(authorization, filter)?;
        self.transition(SessionState::Streaming);
        Ok(())
    }

    /// Deregister from the backend. Only the first call sends the stop
    /// signal; a session that never connected has nothing to deregister.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.transition(SessionState::Closed);
        if let Some(connection_id) = &self.connection_id {
            self.subscriptions.stop(&self.correlation_id, connection_id);
        }
    }

    fn transition(&mut self, next: SessionState) {
        debug!(
            "Session {} moving {:?} -> {:?}",
            self.correlation_id, self.state, next
        );
        self.state = next;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}
