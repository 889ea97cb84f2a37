//! Protocol messages.
//!
//! Outbound frames are `{"command": ..., "params": {...}}`. Inbound frames are
//! `{"type": ..., ...fields}`; fields with an unexpected shape read as absent and
//! unknown types decode to [`InboundMessage::Unknown`].

use crate::Mode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Commands sent from the dashboard to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "params", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Wake the assistant (backend answers with an awake `status`).
    Wake {},
    /// Put the assistant to sleep.
    Sleep {},
    /// Switch the active input mode.
    SwitchMode { mode: Mode },
    /// Run a named system action, e.g. "volume up".
    Execute { command: String },
    /// Launch the gesture-controlled game.
    StartGame {},
    /// Stop the assistant entirely.
    Stop {},
}

impl ClientCommand {
    pub fn switch_mode(mode: Mode) -> Self {
        Self::SwitchMode { mode }
    }

    pub fn execute(command: impl Into<String>) -> Self {
        Self::Execute {
            command: command.into(),
        }
    }

    /// The wire command name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wake {} => "wake",
            Self::Sleep {} => "sleep",
            Self::SwitchMode { .. } => "switch_mode",
            Self::Execute { .. } => "execute",
            Self::StartGame {} => "start_game",
            Self::Stop {} => "stop",
        }
    }

    /// Encode as a text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Where a history line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Voice,
    Gesture,
    System,
}

/// Severity attached to backend `log` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Messages pushed from the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Assistant state. `status` is "awake" or anything else for asleep.
    Status {
        #[serde(default, deserialize_with = "lenient")]
        status: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        mode: Option<Mode>,
    },
    /// Host metrics as percentages; each one is optional.
    SystemInfo {
        #[serde(default, deserialize_with = "lenient")]
        battery: Option<f64>,
        #[serde(default, deserialize_with = "lenient")]
        cpu: Option<f64>,
        #[serde(default, deserialize_with = "lenient")]
        ram: Option<f64>,
        #[serde(default, deserialize_with = "lenient")]
        disk: Option<f64>,
    },
    Log {
        #[serde(default, deserialize_with = "lenient")]
        message: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        category: Option<Category>,
        #[serde(default, deserialize_with = "lenient")]
        level: Option<LogLevel>,
    },
    /// A recognized voice command, echoed back with its result.
    Command {
        #[serde(default, deserialize_with = "lenient")]
        command: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        response: Option<String>,
    },
    Gesture {
        #[serde(default, deserialize_with = "lenient")]
        gesture: Option<String>,
    },
    Response {
        #[serde(default, deserialize_with = "lenient")]
        message: Option<String>,
    },
    Error {
        #[serde(default, deserialize_with = "lenient")]
        message: Option<String>,
    },
    /// Any type this client does not know about.
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    /// Decode a text frame.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(ProtocolError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Treat a field of the wrong shape as missing instead of failing the frame.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// A frame that could not be decoded.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object")]
    NotAnObject,
}
