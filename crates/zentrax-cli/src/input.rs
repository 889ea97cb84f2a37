//! Terminal commands.
//!
//! Each stdin line is one control: the buttons, shortcuts and visibility
//! changes of the dashboard, spelled out as words.

use zentrax_client::keymap;
use zentrax_client::{Event, Intent, QuickAction};
use zentrax_core::Mode;

pub const HELP: &str = "\
commands:
  wake | sleep | toggle        wake or sleep the assistant (ctrl+w toggles)
  mode <voice|gesture|game>    switch mode (ctrl+1, ctrl+2, ctrl+3)
  game                         start the game
  action <name>                quick action: screenshot, volume_up, volume_down,
                               mute, brightness_up, lock
  exec <text>                  run any named action
  stop                         stop the assistant
  clear                        clear the history panel
  hidden | visible             simulate the dashboard being hidden or shown
  history                      print the history panel
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Event(Event),
    History,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Mode(#[from] zentrax_core::ModeParseError),
    #[error(transparent)]
    Action(#[from] zentrax_client::UnknownAction),
}

/// Parse one line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Input>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let word = word.to_ascii_lowercase();

    if let Some(key) = word.strip_prefix("ctrl+") {
        let mut chars = key.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => keymap::shortcut(true, c)
                .map(|intent| Some(Input::Event(Event::Intent(intent))))
                .ok_or_else(|| InputError::Unknown(line.to_string())),
            _ => Err(InputError::Unknown(line.to_string())),
        };
    }

    let intent = |intent: Intent| -> Result<Option<Input>, InputError> {
        Ok(Some(Input::Event(Event::Intent(intent))))
    };
    match word.as_str() {
        "wake" => intent(Intent::Wake),
        "sleep" => intent(Intent::Sleep),
        "toggle" => intent(Intent::ToggleWake),
        "game" => intent(Intent::StartGame),
        "stop" => intent(Intent::Stop),
        "mode" => {
            let mode: Mode = required(rest, "mode")?.parse()?;
            intent(Intent::SwitchMode(mode))
        }
        "action" => {
            let action: QuickAction = required(rest, "action")?.parse()?;
            intent(Intent::QuickAction(action))
        }
        "exec" => intent(Intent::Execute(required(rest, "exec")?.to_string())),
        "clear" => Ok(Some(Input::Event(Event::ClearHistory))),
        "hidden" => Ok(Some(Input::Event(Event::Visibility { visible: false }))),
        "visible" => Ok(Some(Input::Event(Event::Visibility { visible: true }))),
        "history" => Ok(Some(Input::History)),
        "help" | "?" => Ok(Some(Input::Help)),
        "quit" | "exit" => Ok(Some(Input::Quit)),
        _ => Err(InputError::Unknown(line.to_string())),
    }
}

fn required<'a>(rest: &'a str, command: &'static str) -> Result<&'a str, InputError> {
    if rest.is_empty() {
        Err(InputError::MissingArgument(command))
    } else {
        Ok(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(line: &str) -> Intent {
        match parse(line) {
            Ok(Some(Input::Event(Event::Intent(intent)))) => intent,
            other => panic!("{line:?} parsed to {other:?}"),
        }
    }

    #[test]
    fn words_map_to_intents() {
        assert_eq!(intent("wake"), Intent::Wake);
        assert_eq!(intent("  Sleep "), Intent::Sleep);
        assert_eq!(intent("mode gesture"), Intent::SwitchMode(Mode::Gesture));
        assert_eq!(intent("game"), Intent::StartGame);
        assert_eq!(intent("action volume_up"), Intent::QuickAction(QuickAction::VolumeUp));
        assert_eq!(intent("exec open browser"), Intent::Execute("open browser".into()));
    }

    #[test]
    fn shortcuts() {
        assert_eq!(intent("ctrl+w"), Intent::ToggleWake);
        assert_eq!(intent("CTRL+3"), Intent::SwitchMode(Mode::Game));
        assert!(matches!(parse("ctrl+q"), Err(InputError::Unknown(_))));
        assert!(matches!(parse("ctrl+ww"), Err(InputError::Unknown(_))));
    }

    #[test]
    fn local_controls() {
        assert_eq!(parse("clear").unwrap(), Some(Input::Event(Event::ClearHistory)));
        assert_eq!(
            parse("visible").unwrap(),
            Some(Input::Event(Event::Visibility { visible: true }))
        );
        assert_eq!(parse("history").unwrap(), Some(Input::History));
        assert_eq!(parse("quit").unwrap(), Some(Input::Quit));
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn bad_arguments() {
        assert_eq!(parse("mode"), Err(InputError::MissingArgument("mode")));
        assert!(matches!(parse("mode hill_climb"), Err(InputError::Mode(_))));
        assert!(matches!(parse("action teleport"), Err(InputError::Action(_))));
        assert!(matches!(parse("dance"), Err(InputError::Unknown(_))));
    }
}
