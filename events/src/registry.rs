//! Shared registry of session channels, keyed by correlation id.

use crate::{StreamError, StreamItem, StreamingCategory};
use dashmap::DashMap;
use domain::{CorrelationId, ThingEvent};
use log::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Server-generated identity of one registered session channel.
///
/// Correlation ids come from clients and may collide or be reused, so every
/// registration gets its own connection id as well. Deregistration and
/// pruning compare it before touching an entry, which keeps a stale teardown
/// from removing the session that replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State kept per registered session.
#[derive(Debug)]
struct SessionEntry {
    connection_id: ConnectionId,
    sender: mpsc::Sender<StreamItem>,
    category: StreamingCategory,
    /// Set once start-streaming has been processed; nothing is delivered
    /// before that.
    active: bool,
}

/// Concurrent map of all registered sessions. The manager task writes to it
/// while publishers read from it, so entries live behind a [`DashMap`].
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<CorrelationId, SessionEntry>,
    /// Set by [`SessionRegistry::close_all`]; a closed registry refuses
    /// registrations so no stream can outlive a shutdown.
    closed: AtomicBool,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Insert a session channel, replacing any previous registration under
    /// the same correlation id. Returns the replaced connection id, if any;
    /// dropping the replaced entry closes its channel. Once the registry is
    /// closed the channel is dropped instead, which ends the attached stream
    /// right away.
    pub(crate) fn register(
        &self,
        correlation_id: CorrelationId,
        connection_id: ConnectionId,
        sender: mpsc::Sender<StreamItem>,
        category: StreamingCategory,
    ) -> Option<ConnectionId> {
        if self.closed.load(Ordering::Acquire) {
            debug!("Registry is closed, refusing registration for session {correlation_id}");
            return None;
        }
        let entry = SessionEntry {
            connection_id,
            sender,
            category,
            active: false,
        };
        self.sessions
            .insert(correlation_id, entry)
            .map(|replaced| replaced.connection_id)
    }

    /// Mark a session as streaming the given category. Refused when the
    /// correlation id is unknown or registered by a different connection.
    pub(crate) fn activate(
        &self,
        correlation_id: &CorrelationId,
        connection_id: &ConnectionId,
        category: StreamingCategory,
    ) -> bool {
        match self.sessions.get_mut(correlation_id) {
            Some(mut entry) if entry.connection_id == *connection_id => {
                entry.category = category;
                entry.active = true;
                true
            }
            _ => false,
        }
    }

    /// Push a terminal error into a session's channel. The channel is fresh
    /// at every point this is called, so a full buffer is not expected; if it
    /// happens anyway the error is dropped and logged.
    pub(crate) fn push_error(
        &self,
        correlation_id: &CorrelationId,
        connection_id: &ConnectionId,
        error: StreamError,
    ) {
        match self.sessions.get(correlation_id) {
            Some(entry) if entry.connection_id == *connection_id => {
                if let Err(send_error) = entry.sender.try_send(StreamItem::Error(error)) {
                    warn!("Could not surface stream error to session {correlation_id}: {send_error}");
                }
            }
            _ => debug!("Dropping stream error for unknown session {correlation_id}"),
        }
    }

    /// Remove a session, but only while it still belongs to the given
    /// connection. Safe to call repeatedly.
    pub(crate) fn remove(
        &self,
        correlation_id: &CorrelationId,
        connection_id: &ConnectionId,
    ) -> bool {
        self.sessions
            .remove_if(correlation_id, |_, entry| {
                entry.connection_id == *connection_id
            })
            .is_some()
    }

    /// Fan an event out to every streaming session subscribed to events.
    ///
    /// Sends await channel capacity, so one slow consumer slows the publisher
    /// down rather than losing items. Sessions whose receiver is gone are
    /// pruned along the way. Returns how many sessions took the event.
    pub async fn deliver(&self, event: &ThingEvent) -> usize {
        // Snapshot the targets first: awaiting sends while iterating would
        // hold shard locks across suspension points.
        let targets: Vec<(CorrelationId, ConnectionId, mpsc::Sender<StreamItem>)> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().active && entry.value().category == StreamingCategory::Events)
            .map(|entry| {
                (
                    entry.key().clone(),
                    entry.value().connection_id.clone(),
                    entry.value().sender.clone(),
                )
            })
            .collect();

        let mut delivered = 0;
        for (correlation_id, connection_id, sender) in targets {
            match sender.send(StreamItem::Event(event.clone())).await {
                Ok(()) => delivered += 1,
                Err(_) => {
                    debug!("Pruning session {correlation_id}, its receiver is gone");
                    self.remove(&correlation_id, &connection_id);
                }
            }
        }
        delivered
    }

    /// Close every session and refuse registrations from then on. Dropping
    /// the entries closes their channels, which ends the attached streams.
    /// Returns how many sessions were closed.
    pub fn close_all(&self) -> usize {
        self.closed.store(true, Ordering::Release);
        let closed = self.sessions.len();
        self.sessions.clear();
        closed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn streaming_count(&self) -> usize {
        self.sessions.iter().filter(|entry| entry.value().active).count()
    }
}
