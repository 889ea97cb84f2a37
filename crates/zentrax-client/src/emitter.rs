//! User intents to outbound commands.
//!
//! Emitting never changes session state; the backend confirms through a
//! `status` message. The only local effect is a history line describing the
//! request, or a "not connected" notice when there is no connection.

use crate::store::Store;
use crate::transport::{Connector, Scheduler, Transport};
use std::fmt;
use std::str::FromStr;
use zentrax_core::{Category, ClientCommand, Mode};

pub const NOT_CONNECTED: &str = "Not connected to backend";

/// Built-in quick-action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Screenshot,
    VolumeUp,
    VolumeDown,
    Mute,
    BrightnessUp,
    Lock,
}

impl QuickAction {
    pub const ALL: [QuickAction; 6] = [
        QuickAction::Screenshot,
        QuickAction::VolumeUp,
        QuickAction::VolumeDown,
        QuickAction::Mute,
        QuickAction::BrightnessUp,
        QuickAction::Lock,
    ];

    /// The action name the backend executes.
    pub fn command(&self) -> &'static str {
        match self {
            Self::Screenshot => "take screenshot",
            Self::VolumeUp => "volume up",
            Self::VolumeDown => "volume down",
            Self::Mute => "mute",
            Self::BrightnessUp => "brightness up",
            Self::Lock => "lock screen",
        }
    }

    /// Button identifier, e.g. `volume_up`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Screenshot => "screenshot",
            Self::VolumeUp => "volume_up",
            Self::VolumeDown => "volume_down",
            Self::Mute => "mute",
            Self::BrightnessUp => "brightness_up",
            Self::Lock => "lock",
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key().replace('_', " "))
    }
}

impl FromStr for QuickAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().replace(' ', "_").to_ascii_lowercase();
        QuickAction::ALL
            .into_iter()
            .find(|a| a.key() == key)
            .ok_or_else(|| UnknownAction(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quick action {0:?}")]
pub struct UnknownAction(pub String);

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Wake if asleep, sleep if awake.
    ToggleWake,
    Wake,
    Sleep,
    SwitchMode(Mode),
    StartGame,
    /// Run a free-text action.
    Execute(String),
    QuickAction(QuickAction),
    Stop,
}

impl Intent {
    /// The command this intent sends, resolving toggles against `awake`.
    pub fn command(&self, awake: bool) -> ClientCommand {
        match self {
            Self::ToggleWake if awake => ClientCommand::Sleep {},
            Self::ToggleWake | Self::Wake => ClientCommand::Wake {},
            Self::Sleep => ClientCommand::Sleep {},
            Self::SwitchMode(mode) => ClientCommand::switch_mode(*mode),
            Self::StartGame => ClientCommand::StartGame {},
            Self::Execute(command) => ClientCommand::execute(command.clone()),
            Self::QuickAction(action) => ClientCommand::execute(action.command()),
            Self::Stop => ClientCommand::Stop {},
        }
    }

    fn describe(&self, command: &ClientCommand) -> String {
        match (self, command) {
            (Self::QuickAction(action), _) => format!("Quick action: {action}"),
            (_, ClientCommand::Wake {}) => "Wake requested".to_string(),
            (_, ClientCommand::Sleep {}) => "Sleep requested".to_string(),
            (_, ClientCommand::SwitchMode { mode }) => format!("Switching to {mode} mode"),
            (_, ClientCommand::StartGame {}) => "Starting game".to_string(),
            (_, ClientCommand::Execute { command }) => format!("Executing: {command}"),
            (_, ClientCommand::Stop {}) => "Stop requested".to_string(),
        }
    }
}

/// Send the command for `intent` and log the request locally.
///
/// Returns whether the command went out.
pub fn emit<C, S>(
    transport: &mut Transport<C, S>,
    store: &mut Store,
    intent: &Intent,
    now_ms: u64,
) -> bool
where
    C: Connector,
    S: Scheduler,
{
    let command = intent.command(store.session().awake);
    let sent = match transport.send(&command) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Dropping {}: {}", command.name(), e);
            store.set_response(NOT_CONNECTED, false);
            false
        }
    };
    store.append(Category::System, intent.describe(&command), now_ms);
    sent
}
