//! Inbound message dispatch.

use crate::store::{MetricsUpdate, Store};
use zentrax_core::{Category, InboundMessage, LogLevel};

/// Apply one backend message to the store.
///
/// Messages missing their required field are dropped; unknown types are ignored.
pub fn route(store: &mut Store, message: InboundMessage, now_ms: u64) {
    match message {
        InboundMessage::Status { status, mode } => {
            let Some(status) = status else {
                tracing::debug!("status message without status");
                return;
            };
            let awake = status == "awake";
            store.set_status(awake, if awake { mode } else { None });
        }

        InboundMessage::SystemInfo {
            battery,
            cpu,
            ram,
            disk,
        } => store.update_metrics(MetricsUpdate {
            battery,
            cpu,
            ram,
            disk,
        }),

        InboundMessage::Log {
            message,
            category,
            level,
        } => {
            let Some(message) = message else {
                tracing::debug!("log message without text");
                return;
            };
            match level {
                Some(LogLevel::Error) => tracing::error!("backend: {}", message),
                Some(LogLevel::Warning) => tracing::warn!("backend: {}", message),
                _ => tracing::info!("backend: {}", message),
            }
            store.append(category.unwrap_or(Category::System), message, now_ms);
        }

        InboundMessage::Command { command, response } => {
            let Some(command) = command else {
                tracing::debug!("command echo without command");
                return;
            };
            let response = response.unwrap_or_else(|| format!("Executed: {command}"));
            store.append(Category::Voice, command, now_ms);
            store.set_response(response, false);
        }

        InboundMessage::Gesture { gesture } => match gesture {
            Some(gesture) => store.append(Category::Gesture, gesture, now_ms),
            None => tracing::debug!("gesture echo without gesture"),
        },

        InboundMessage::Response { message } => match message {
            Some(message) => store.set_response(message, false),
            None => tracing::debug!("response without message"),
        },

        InboundMessage::Error { message } => match message {
            Some(message) => {
                tracing::warn!("backend error: {}", message);
                store.set_response(message, true);
            }
            None => tracing::debug!("error without message"),
        },

        InboundMessage::Unknown => tracing::trace!("ignoring unknown message type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Render, Response};
    use zentrax_core::Mode;

    fn routed(store: &mut Store, raw: &str) {
        route(store, InboundMessage::parse(raw).unwrap(), 1_000);
    }

    #[test]
    fn awake_then_command_echo() {
        let mut store = Store::default();
        routed(&mut store, r#"{"type":"status","status":"awake","mode":"voice"}"#);
        routed(
            &mut store,
            r#"{"type":"command","command":"lock screen","response":"Screen locked"}"#,
        );

        let session = store.session();
        assert!(session.awake);
        assert_eq!(session.mode, Some(Mode::Voice));
        assert_eq!(
            session.last_response,
            Some(Response {
                text: "Screen locked".into(),
                is_error: false,
            })
        );

        let entries: Vec<_> = store.history().newest_first().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, Category::Voice);
        assert_eq!(entries[0].text, "lock screen");
    }

    #[test]
    fn command_without_response_reports_execution() {
        let mut store = Store::default();
        routed(&mut store, r#"{"type":"command","command":"mute"}"#);
        assert_eq!(
            store.session().last_response.as_ref().map(|r| r.text.as_str()),
            Some("Executed: mute")
        );
    }

    #[test]
    fn sleeping_status_keeps_last_mode() {
        let mut store = Store::default();
        routed(&mut store, r#"{"type":"status","status":"awake","mode":"gesture"}"#);
        routed(&mut store, r#"{"type":"status","status":"sleeping","mode":"game"}"#);
        assert!(!store.session().awake);
        assert_eq!(store.session().mode, Some(Mode::Gesture));
    }

    #[test]
    fn battery_only_update() {
        let mut store = Store::default();
        routed(&mut store, r#"{"type":"system_info","battery":90,"cpu":12,"ram":48,"disk":61}"#);
        routed(&mut store, r#"{"type":"system_info","battery":15}"#);
        let metrics = store.session().metrics;
        assert_eq!(
            (metrics.battery, metrics.cpu, metrics.ram, metrics.disk),
            (Some(15), Some(12), Some(48), Some(61))
        );
    }

    #[test]
    fn log_and_gesture_entries() {
        let mut store = Store::default();
        routed(&mut store, r#"{"type":"log","message":"Zentrax is going to sleep","level":"info"}"#);
        routed(&mut store, r#"{"type":"log","message":"heard it","category":"voice"}"#);
        routed(&mut store, r#"{"type":"gesture","gesture":"thumbs up"}"#);

        let kinds: Vec<_> = store.history().newest_first().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![Category::Gesture, Category::Voice, Category::System]);
    }

    #[test]
    fn response_and_error() {
        let mut store = Store::default();
        routed(&mut store, r#"{"type":"response","message":"Done"}"#);
        assert_eq!(store.session().last_response.as_ref().map(|r| r.is_error), Some(false));

        routed(&mut store, r#"{"type":"error","message":"Invalid JSON format"}"#);
        assert_eq!(
            store.session().last_response,
            Some(Response {
                text: "Invalid JSON format".into(),
                is_error: true,
            })
        );
    }

    #[test]
    fn incomplete_and_unknown_messages_change_nothing() {
        let mut store = Store::default();
        for raw in [
            r#"{"type":"status"}"#,
            r#"{"type":"log","message":42}"#,
            r#"{"type":"command","response":"orphan"}"#,
            r#"{"type":"gesture"}"#,
            r#"{"type":"error"}"#,
            r#"{"type":"calibration","progress":0.5}"#,
        ] {
            routed(&mut store, raw);
        }
        assert_eq!(*store.session(), Default::default());
        assert!(store.history().is_empty());
        assert!(store.take_renders().is_empty());
    }

    #[test]
    fn every_update_renders() {
        let mut store = Store::default();
        routed(&mut store, r#"{"type":"status","status":"awake","mode":"game"}"#);
        assert_eq!(
            store.take_renders(),
            vec![Render::Assistant {
                awake: true,
                mode: Some(Mode::Game),
            }]
        );
    }
}
