//! Connection lifecycle and reconnection.
//!
//! [`Transport`] owns no sockets itself. It drives a [`Connector`] that opens
//! connections and a [`Scheduler`] that arms retry timers, and consumes the
//! [`TransportEvent`]s those produce. At most one connection is current; events
//! tagged with any other [`ConnectionId`] are dropped.

use crate::error::TransportError;
use crate::policy::ReconnectPolicy;
use std::fmt;
use std::time::Duration;
use zentrax_core::{ClientCommand, ConnectionState, InboundMessage, ProtocolError};

/// Identifies one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something that happened on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEventKind {
    Opened,
    Message(String),
    Error(String),
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub id: ConnectionId,
    pub kind: TransportEventKind,
}

impl TransportEvent {
    pub fn new(id: ConnectionId, kind: TransportEventKind) -> Self {
        Self { id, kind }
    }
}

/// Opens connections and carries outbound frames.
pub trait Connector {
    /// Start a connection attempt. Its lifecycle is reported later as events
    /// tagged with `id`; starting a new attempt abandons any previous one.
    fn open(&mut self, id: ConnectionId, url: &str) -> Result<(), TransportError>;

    /// Hand a text frame to the open connection.
    fn send(&mut self, text: String) -> Result<(), TransportError>;
}

/// A pending timer that can be called off.
pub trait TimerHandle {
    fn cancel(self);
}

/// Arms the reconnect timer. When it fires the owner calls
/// [`Transport::reconnect_due`].
pub trait Scheduler {
    type Handle: TimerHandle;

    fn schedule(&mut self, delay: Duration) -> Self::Handle;
}

/// What a transport event means for the session.
#[derive(Debug)]
pub enum Link {
    /// The connection opened.
    Up,
    /// A frame arrived, decoded or not.
    Message(Result<InboundMessage, ProtocolError>),
    /// The connection reported an error; a close normally follows.
    Fault(String),
    /// The connection is gone. `retry_in` is set when a retry was scheduled.
    Down { retry_in: Option<Duration> },
}

pub struct Transport<C, S: Scheduler> {
    url: String,
    connector: C,
    scheduler: S,
    policy: ReconnectPolicy,
    state: ConnectionState,
    current: Option<ConnectionId>,
    next_id: u64,
    retry: Option<S::Handle>,
}

impl<C: Connector, S: Scheduler> Transport<C, S> {
    pub fn new(
        url: impl Into<String>,
        connector: C,
        scheduler: S,
        policy: ReconnectPolicy,
    ) -> Self {
        Self {
            url: url.into(),
            connector,
            scheduler,
            policy,
            state: ConnectionState::Disconnected,
            current: None,
            next_id: 0,
            retry: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Whether a retry timer is armed.
    pub fn retry_pending(&self) -> bool {
        self.retry.is_some()
    }

    /// Start a connection attempt unless one is open or in flight.
    ///
    /// A connector that fails synchronously is handled like a close, so the
    /// result may be a scheduled retry rather than an attempt in flight.
    pub fn connect(&mut self) -> Option<Link> {
        if self.state != ConnectionState::Disconnected {
            tracing::debug!("connect skipped, already {:?}", self.state);
            return None;
        }

        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        self.current = Some(id);
        self.state = ConnectionState::Connecting;
        tracing::info!("Connecting to {} ({})", self.url, id);

        match self.connector.open(id, &self.url) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Failed to open connection {}: {}", id, e);
                self.current = None;
                Some(self.closed())
            }
        }
    }

    /// The reconnect timer fired.
    pub fn reconnect_due(&mut self) -> Option<Link> {
        self.retry = None;
        self.connect()
    }

    /// The host became visible again. Recovers a dead connection even after the
    /// retry budget is spent.
    pub fn resume(&mut self) -> Option<Link> {
        if self.state == ConnectionState::Disconnected {
            tracing::info!("Resuming connection");
        }
        self.connect()
    }

    /// Encode and send a command. Never queues.
    pub fn send(&mut self, command: &ClientCommand) -> Result<(), TransportError> {
        if !self.state.is_connected() {
            return Err(TransportError::NotConnected);
        }
        let text = command.to_json()?;
        self.connector.send(text)?;
        tracing::debug!("Sent {}", command.name());
        Ok(())
    }

    pub fn handle(&mut self, event: TransportEvent) -> Option<Link> {
        if self.current != Some(event.id) {
            tracing::trace!("Ignoring event from stale connection {}", event.id);
            return None;
        }

        match event.kind {
            TransportEventKind::Opened => {
                self.policy.reset();
                if let Some(timer) = self.retry.take() {
                    timer.cancel();
                }
                self.state = ConnectionState::Connected;
                tracing::info!("Connected to {}", self.url);
                Some(Link::Up)
            }
            TransportEventKind::Message(raw) => Some(Link::Message(InboundMessage::parse(&raw))),
            TransportEventKind::Error(e) => {
                tracing::warn!("Connection {} error: {}", event.id, e);
                self.state = ConnectionState::Disconnected;
                Some(Link::Fault(e))
            }
            TransportEventKind::Closed => {
                self.current = None;
                Some(self.closed())
            }
        }
    }

    fn closed(&mut self) -> Link {
        self.state = ConnectionState::Disconnected;

        let retry_in = if self.retry.is_some() {
            None
        } else {
            self.policy.next_retry()
        };

        match retry_in {
            Some(delay) => {
                tracing::info!(
                    "Reconnecting in {:.1}s (attempt {}/{})",
                    delay.as_secs_f64(),
                    self.policy.attempt(),
                    self.policy.max_attempts()
                );
                self.retry = Some(self.scheduler.schedule(delay));
            }
            None if self.retry.is_none() => {
                tracing::warn!(
                    "Giving up after {} reconnect attempts",
                    self.policy.max_attempts()
                );
            }
            None => {}
        }

        Link::Down { retry_in }
    }
}
