//! Client side of the Zentrax dashboard.
//!
//! A [`Controller`] holds one session: the [`Transport`] that keeps a
//! connection to the backend alive, and the [`Store`] of what the dashboard
//! shows. Inbound frames go through [`router::route`]; user intents go out
//! through [`emitter::emit`]. [`Runtime`] runs a controller on tokio with a
//! real WebSocket.

mod controller;
mod error;
mod history;
mod policy;
mod runtime;
mod store;
mod transport;

pub mod emitter;
pub mod keymap;
pub mod router;

pub use controller::{Clock, Controller, Event, SystemClock};
pub use emitter::{Intent, QuickAction, UnknownAction};
pub use error::TransportError;
pub use history::{History, HistoryEntry};
pub use policy::ReconnectPolicy;
pub use runtime::{ClientConfig, Runtime, TokioScheduler, WsConnector};
pub use store::{BatteryLevel, Metrics, MetricsUpdate, Render, Response, SessionState, Store};
pub use transport::{
    ConnectionId, Connector, Link, Scheduler, TimerHandle, Transport, TransportEvent,
    TransportEventKind,
};
