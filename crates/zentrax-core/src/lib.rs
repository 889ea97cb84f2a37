//! Core types for the Zentrax dashboard protocol.
//!
//! This crate provides the wire vocabulary shared by the dashboard client and
//! anything that speaks to the assistant backend; it does no I/O.

mod message;
mod mode;

pub use message::{Category, ClientCommand, InboundMessage, LogLevel, ProtocolError};
pub use mode::{Mode, ModeParseError};

/// Default backend endpoint.
pub const DEFAULT_URL: &str = "ws://localhost:8765";

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live connection and no attempt in flight.
    #[default]
    Disconnected,
    /// Attempt in flight.
    Connecting,
    /// Normal operation.
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}
