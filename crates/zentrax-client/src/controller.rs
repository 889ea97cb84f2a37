//! One dashboard session.
//!
//! The controller owns the transport and the store and is driven one
//! [`Event`] at a time through [`Controller::handle`]. Nothing in here blocks or
//! spawns; see `runtime` for the tokio side.

use crate::emitter::{self, Intent};
use crate::history::History;
use crate::router;
use crate::store::{Render, SessionState, Store};
use crate::transport::{Connector, Link, Scheduler, Transport, TransportEvent};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use zentrax_core::Category;

/// Wall-clock milliseconds for history timestamps.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Everything the session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Transport(TransportEvent),
    /// The reconnect timer fired.
    ReconnectDue,
    Intent(Intent),
    /// Empty the history panel. Local only.
    ClearHistory,
    /// The host view was hidden or shown.
    Visibility { visible: bool },
    Shutdown,
}

pub struct Controller<C, S: Scheduler, K = SystemClock> {
    transport: Transport<C, S>,
    store: Store,
    clock: K,
}

impl<C: Connector, S: Scheduler> Controller<C, S> {
    pub fn new(transport: Transport<C, S>, history_capacity: usize) -> Self {
        Self::with_clock(transport, history_capacity, SystemClock)
    }
}

impl<C: Connector, S: Scheduler, K: Clock> Controller<C, S, K> {
    pub fn with_clock(transport: Transport<C, S>, history_capacity: usize, clock: K) -> Self {
        Self {
            transport,
            store: Store::new(history_capacity),
            clock,
        }
    }

    pub fn session(&self) -> &SessionState {
        self.store.session()
    }

    pub fn history(&self) -> &History {
        self.store.history()
    }

    pub fn transport(&self) -> &Transport<C, S> {
        &self.transport
    }

    pub fn take_renders(&mut self) -> Vec<Render> {
        self.store.take_renders()
    }

    /// Open the first connection.
    pub fn start(&mut self) {
        let link = self.transport.connect();
        self.sync_connection();
        if let Some(link) = link {
            self.apply(link);
        }
    }

    pub fn handle(&mut self, event: Event) {
        let link = match event {
            Event::Transport(event) => self.transport.handle(event),
            Event::ReconnectDue => self.transport.reconnect_due(),
            Event::Visibility { visible: true } => self.transport.resume(),
            Event::Visibility { visible: false } => None,
            Event::Intent(intent) => {
                let now = self.clock.now_ms();
                emitter::emit(&mut self.transport, &mut self.store, &intent, now);
                None
            }
            Event::ClearHistory => {
                self.store.clear_history();
                None
            }
            Event::Shutdown => None,
        };

        self.sync_connection();
        if let Some(link) = link {
            self.apply(link);
        }
    }

    fn apply(&mut self, link: Link) {
        let now = self.clock.now_ms();
        match link {
            Link::Up => {
                self.store.append(Category::System, "Connected to backend", now);
            }
            Link::Message(Ok(message)) => router::route(&mut self.store, message, now),
            Link::Message(Err(e)) => {
                tracing::warn!("Failed to parse message: {}", e);
                self.store
                    .append(Category::System, format!("Failed to parse message: {e}"), now);
            }
            Link::Fault(reason) => {
                self.store
                    .append(Category::System, format!("Connection error: {reason}"), now);
            }
            Link::Down { retry_in: Some(delay) } => {
                self.store.append(
                    Category::System,
                    format!("Disconnected from backend, reconnecting in {}", seconds(delay)),
                    now,
                );
            }
            Link::Down { retry_in: None } => {
                if !self.transport.retry_pending() {
                    self.store.append(
                        Category::System,
                        "Disconnected from backend, not retrying",
                        now,
                    );
                }
            }
        }
    }

    fn sync_connection(&mut self) {
        self.store.set_connection(self.transport.state());
    }
}

fn seconds(delay: Duration) -> String {
    if delay.subsec_millis() == 0 {
        format!("{}s", delay.as_secs())
    } else {
        format!("{:.1}s", delay.as_secs_f64())
    }
}
