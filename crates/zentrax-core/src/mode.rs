//! Assistant input modes.
//!
//! Wire format is the lowercase mode name: `voice`, `gesture`, `game`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The input mode the assistant is listening in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Voice,
    Gesture,
    Game,
}

impl Mode {
    /// All modes, in selector order.
    pub const ALL: [Mode; 3] = [Mode::Voice, Mode::Gesture, Mode::Game];

    /// The wire name (e.g., "voice").
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Voice => "voice",
            Mode::Gesture => "gesture",
            Mode::Game => "game",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ModeParseError(name.to_string()))
    }
}

/// Error parsing a mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode {0:?}, expected voice, gesture or game")]
pub struct ModeParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Gesture".parse::<Mode>().unwrap(), Mode::Gesture);
        assert_eq!(" game ".parse::<Mode>().unwrap(), Mode::Game);
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "hill_climb".parse::<Mode>().unwrap_err();
        assert_eq!(err, ModeParseError("hill_climb".to_string()));
    }

    #[test]
    fn wire_name_matches_display() {
        for mode in Mode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{mode}\""));
        }
    }
}
