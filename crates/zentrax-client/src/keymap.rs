//! Keyboard shortcuts.
//!
//! Ctrl+W toggles wake; Ctrl+1/2/3 select voice, gesture and game. Mode
//! shortcuts fire regardless of the awake state, same as the mode buttons.

use crate::emitter::Intent;
use zentrax_core::Mode;

pub fn shortcut(ctrl: bool, key: char) -> Option<Intent> {
    if !ctrl {
        return None;
    }
    match key.to_ascii_lowercase() {
        'w' => Some(Intent::ToggleWake),
        '1' => Some(Intent::SwitchMode(Mode::Voice)),
        '2' => Some(Intent::SwitchMode(Mode::Gesture)),
        '3' => Some(Intent::SwitchMode(Mode::Game)),
        _ => None,
    }
}
