//! Session state and render notifications.
//!
//! The store is the single owner of what the dashboard shows. Every mutation
//! that changes something visible queues a [`Render`]; the caller drains them
//! with [`Store::take_renders`] after each event.

use crate::history::{History, HistoryEntry};
use zentrax_core::{Category, ConnectionState, Mode};

/// Host metrics, each a percentage in 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub battery: Option<u8>,
    pub cpu: Option<u8>,
    pub ram: Option<u8>,
    pub disk: Option<u8>,
}

impl Metrics {
    pub fn battery_level(&self) -> Option<BatteryLevel> {
        self.battery.map(BatteryLevel::from_percent)
    }
}

/// A partial metrics report. Absent fields keep their previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsUpdate {
    pub battery: Option<f64>,
    pub cpu: Option<f64>,
    pub ram: Option<f64>,
    pub disk: Option<f64>,
}

/// Battery display bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryLevel {
    Critical,
    Warning,
    Normal,
}

impl BatteryLevel {
    pub fn from_percent(percent: u8) -> Self {
        match percent {
            0..=20 => Self::Critical,
            21..=40 => Self::Warning,
            _ => Self::Normal,
        }
    }
}

/// Last message shown in the response panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub is_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub connection: ConnectionState,
    pub awake: bool,
    pub mode: Option<Mode>,
    pub last_response: Option<Response>,
    pub metrics: Metrics,
}

/// What changed, for whoever draws the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    Connection(ConnectionState),
    Assistant { awake: bool, mode: Option<Mode> },
    Metrics(Metrics),
    Response(Response),
    HistoryAppended(HistoryEntry),
    HistoryCleared,
}

#[derive(Debug)]
pub struct Store {
    session: SessionState,
    history: History,
    renders: Vec<Render>,
}

impl Store {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            session: SessionState::default(),
            history: History::new(history_capacity),
            renders: Vec::new(),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn set_connection(&mut self, state: ConnectionState) {
        if self.session.connection != state {
            self.session.connection = state;
            self.renders.push(Render::Connection(state));
        }
    }

    /// Apply a backend status report. A missing mode leaves the current one.
    pub fn set_status(&mut self, awake: bool, mode: Option<Mode>) {
        self.session.awake = awake;
        if mode.is_some() {
            self.session.mode = mode;
        }
        self.renders.push(Render::Assistant {
            awake,
            mode: self.session.mode,
        });
    }

    pub fn update_metrics(&mut self, update: MetricsUpdate) {
        let metrics = &mut self.session.metrics;
        for (slot, value) in [
            (&mut metrics.battery, update.battery),
            (&mut metrics.cpu, update.cpu),
            (&mut metrics.ram, update.ram),
            (&mut metrics.disk, update.disk),
        ] {
            if let Some(v) = value {
                *slot = Some(clamp_percent(v));
            }
        }
        self.renders.push(Render::Metrics(*metrics));
    }

    pub fn set_response(&mut self, text: impl Into<String>, is_error: bool) {
        let response = Response {
            text: text.into(),
            is_error,
        };
        self.session.last_response = Some(response.clone());
        self.renders.push(Render::Response(response));
    }

    pub fn append(&mut self, kind: Category, text: impl Into<String>, timestamp_ms: u64) {
        let entry = HistoryEntry::new(kind, text, timestamp_ms);
        self.history.push(entry.clone());
        self.renders.push(Render::HistoryAppended(entry));
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.renders.push(Render::HistoryCleared);
    }

    /// Drain queued render notifications, oldest first.
    pub fn take_renders(&mut self) -> Vec<Render> {
        std::mem::take(&mut self.renders)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(History::DEFAULT_CAPACITY)
    }
}

fn clamp_percent(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_metrics_keep_prior_values() {
        let mut store = Store::default();
        store.update_metrics(MetricsUpdate {
            battery: Some(80.0),
            cpu: Some(20.0),
            ram: Some(55.0),
            disk: Some(60.0),
        });
        store.update_metrics(MetricsUpdate {
            battery: Some(15.0),
            ..Default::default()
        });

        let metrics = store.session().metrics;
        assert_eq!(metrics.battery, Some(15));
        assert_eq!(metrics.cpu, Some(20));
        assert_eq!(metrics.ram, Some(55));
        assert_eq!(metrics.disk, Some(60));
        assert_eq!(metrics.battery_level(), Some(BatteryLevel::Critical));
    }

    #[test]
    fn out_of_range_metrics_are_clamped() {
        let mut store = Store::default();
        store.update_metrics(MetricsUpdate {
            battery: Some(140.0),
            cpu: Some(-3.0),
            ram: Some(49.6),
            disk: None,
        });
        let metrics = store.session().metrics;
        assert_eq!(metrics.battery, Some(100));
        assert_eq!(metrics.cpu, Some(0));
        assert_eq!(metrics.ram, Some(50));
        assert_eq!(metrics.disk, None);
    }

    #[test]
    fn battery_buckets() {
        assert_eq!(BatteryLevel::from_percent(0), BatteryLevel::Critical);
        assert_eq!(BatteryLevel::from_percent(20), BatteryLevel::Critical);
        assert_eq!(BatteryLevel::from_percent(21), BatteryLevel::Warning);
        assert_eq!(BatteryLevel::from_percent(40), BatteryLevel::Warning);
        assert_eq!(BatteryLevel::from_percent(41), BatteryLevel::Normal);
        assert_eq!(BatteryLevel::from_percent(100), BatteryLevel::Normal);
    }

    #[test]
    fn status_without_mode_keeps_mode() {
        let mut store = Store::default();
        store.set_status(true, Some(Mode::Gesture));
        store.set_status(false, None);
        assert!(!store.session().awake);
        assert_eq!(store.session().mode, Some(Mode::Gesture));
    }

    #[test]
    fn connection_renders_only_on_change() {
        let mut store = Store::default();
        store.set_connection(ConnectionState::Disconnected);
        assert!(store.take_renders().is_empty());

        store.set_connection(ConnectionState::Connected);
        store.set_connection(ConnectionState::Connected);
        assert_eq!(
            store.take_renders(),
            vec![Render::Connection(ConnectionState::Connected)]
        );
    }

    #[test]
    fn renders_follow_mutation_order() {
        let mut store = Store::default();
        store.append(Category::Voice, "mute", 7);
        store.set_response("Muted", false);
        store.clear_history();

        let renders = store.take_renders();
        assert_eq!(renders.len(), 3);
        assert!(matches!(renders[0], Render::HistoryAppended(ref e) if e.text == "mute"));
        assert!(matches!(renders[1], Render::Response(ref r) if !r.is_error));
        assert_eq!(renders[2], Render::HistoryCleared);
        assert!(store.history().is_empty());
        assert!(store.take_renders().is_empty());
    }
}
