//! Client handle and background task for the subscription mailbox.

use crate::error::Error;
use crate::filter;
use crate::registry::{ConnectionId, SessionRegistry};
use crate::{StreamError, StreamItem, StreamingCategory};
use domain::{AuthorizationContext, CorrelationId, ThingEvent};
use log::*;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Signals a transport exchanges with the subscription side. All of them are
/// fire-and-forget: nothing is awaited and no replies exist. They apply in
/// mailbox order, which is the order they were sent.
#[derive(Debug)]
enum Command {
    Connect {
        correlation_id: CorrelationId,
        connection_id: ConnectionId,
        sender: mpsc::Sender<StreamItem>,
        category: StreamingCategory,
    },
    StartStreaming {
        correlation_id: CorrelationId,
        connection_id: ConnectionId,
        category: StreamingCategory,
        authorization: AuthorizationContext,
        filter: Option<String>,
    },
    Stop {
        correlation_id: CorrelationId,
        connection_id: ConnectionId,
    },
}

/// Proof that a session's connect signal has been handed to the mailbox.
///
/// Start-streaming can only be issued through this value and consumes it, so
/// activation cannot overtake registration and cannot happen twice.
#[derive(Debug)]
#[must_use]
pub struct Registration {
    correlation_id: CorrelationId,
    connection_id: ConnectionId,
    category: StreamingCategory,
    commands: mpsc::UnboundedSender<Command>,
}

impl Registration {
    pub fn connection_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    /// Ask the backend to start delivering items for this session.
    pub fn start_streaming(
        self,
        authorization: AuthorizationContext,
        filter: Option<String>,
    ) -> Result<(), Error> {
        self.commands
            .send(Command::StartStreaming {
                correlation_id: self.correlation_id,
                connection_id: self.connection_id,
                category: self.category,
                authorization,
                filter,
            })
            .map_err(Error::manager_unavailable)
    }
}

/// Cloneable handle to the subscription side of the twin backend.
///
/// In a full deployment this would front a remote subsystem; here it fronts
/// an in-process task plus the shared [`SessionRegistry`]. Control signals go
/// through the task's mailbox so they take effect in send order, while event
/// delivery reads the registry directly.
#[derive(Clone)]
pub struct SubscriptionManager {
    commands: mpsc::UnboundedSender<Command>,
    registry: Arc<SessionRegistry>,
}

impl SubscriptionManager {
    /// Start the mailbox task and return a handle to it.
    pub fn spawn() -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let (commands, mailbox) = mpsc::unbounded_channel();
        tokio::spawn(run(registry.clone(), mailbox));
        Self { commands, registry }
    }

    /// Register a session channel under a correlation id. The returned
    /// [`Registration`] is the only way to activate the session.
    pub fn connect(
        &self,
        sender: mpsc::Sender<StreamItem>,
        correlation_id: CorrelationId,
        category: StreamingCategory,
    ) -> Result<Registration, Error> {
        let connection_id = ConnectionId::new();
        self.commands
            .send(Command::Connect {
                correlation_id: correlation_id.clone(),
                connection_id: connection_id.clone(),
                sender,
                category,
            })
            .map_err(Error::manager_unavailable)?;
        Ok(Registration {
            correlation_id,
            connection_id,
            category,
            commands: self.commands.clone(),
        })
    }

    /// Deregister a session. Harmless when the session is already gone or has
    /// been replaced by a newer registration.
    pub fn stop(&self, correlation_id: &CorrelationId, connection_id: &ConnectionId) {
        // A closed mailbox means no manager task, so nothing left to stop.
        let _ = self.commands.send(Command::Stop {
            correlation_id: correlation_id.clone(),
            connection_id: connection_id.clone(),
        });
    }

    /// Publish one change event to every streaming session. Returns how many
    /// sessions took it.
    pub async fn publish(&self, event: ThingEvent) -> usize {
        self.registry.deliver(&event).await
    }

    /// Close every session, ending each attached stream, and refuse
    /// registrations from then on. An SSE request never finishes on its own,
    /// so a graceful shutdown calls this to make the connection drain
    /// complete. Returns how many sessions were closed.
    pub fn close_all_sessions(&self) -> usize {
        self.registry.close_all()
    }

    /// Number of registered sessions, streaming or not.
    pub fn session_count(&self) -> usize {
        self.registry.session_count()
    }

    /// Number of sessions actively streaming.
    pub fn streaming_count(&self) -> usize {
        self.registry.streaming_count()
    }
}

async fn run(registry: Arc<SessionRegistry>, mut mailbox: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = mailbox.recv().await {
        handle(&registry, command);
    }
    debug!("Subscription mailbox closed, manager task exiting");
}

fn handle(registry: &SessionRegistry, command: Command) {
    match command {
        Command::Connect {
            correlation_id,
            connection_id,
            sender,
            category,
        } => {
            debug!("Registering session {correlation_id} for {category:?}");
            if let Some(replaced) =
                registry.register(correlation_id.clone(), connection_id, sender, category)
            {
                warn!("Session {correlation_id} re-registered, dropped stale connection {replaced}");
            }
        }
        Command::StartStreaming {
            correlation_id,
            connection_id,
            category,
            authorization,
            filter,
        } => {
            if let Some(filter) = &filter {
                if let Err(description) = filter::validate(filter) {
                    warn!("Refusing to stream for session {correlation_id}: {description}");
                    registry.push_error(
                        &correlation_id,
                        &connection_id,
                        StreamError::InvalidFilter { description },
                    );
                    return;
                }
            }
            if registry.activate(&correlation_id, &connection_id, category) {
                debug!(
                    "Streaming {category:?} for session {correlation_id} with {} authorization subject(s)",
                    authorization.subjects().len()
                );
            } else {
                warn!("Ignoring start-streaming for unknown or replaced session {correlation_id}");
            }
        }
        Command::Stop {
            correlation_id,
            connection_id,
        } => {
            if registry.remove(&correlation_id, &connection_id) {
                debug!("Deregistered session {correlation_id}");
            } else {
                debug!("Stop for unknown session {correlation_id}, nothing to do");
            }
        }
    }
}
