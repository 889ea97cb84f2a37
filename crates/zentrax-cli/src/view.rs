//! Text rendering of the dashboard.

use chrono::{DateTime, Local};
use zentrax_client::{BatteryLevel, History, HistoryEntry, Metrics, Render, Response};
use zentrax_core::{Category, ConnectionState, Mode};

/// Mirror of the session built from render updates.
pub struct View {
    connection: ConnectionState,
    awake: bool,
    mode: Option<Mode>,
    metrics: Metrics,
    response: Option<Response>,
    history: History,
}

impl View {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            awake: false,
            mode: None,
            metrics: Metrics::default(),
            response: None,
            history: History::new(history_capacity),
        }
    }

    /// Fold in one update and describe it.
    pub fn apply(&mut self, render: Render) -> String {
        match render {
            Render::Connection(state) => {
                self.connection = state;
                format!("[link] {}", connection_label(state))
            }
            Render::Assistant { awake, mode } => {
                self.awake = awake;
                self.mode = mode;
                format!("[assistant] {}", self.assistant_label())
            }
            Render::Metrics(metrics) => {
                self.metrics = metrics;
                format!("[system] {}", metrics_label(&metrics))
            }
            Render::Response(response) => {
                let line = if response.is_error {
                    format!("[error] {}", response.text)
                } else {
                    format!("[response] {}", response.text)
                };
                self.response = Some(response);
                line
            }
            Render::HistoryAppended(entry) => {
                let line = history_line(&entry);
                self.history.push(entry);
                line
            }
            Render::HistoryCleared => {
                self.history.clear();
                "[history] cleared".to_string()
            }
        }
    }

    pub fn status_line(&self) -> String {
        let mut line = format!(
            "{} | {} | {}",
            connection_label(self.connection),
            self.assistant_label(),
            metrics_label(&self.metrics)
        );
        if let Some(response) = &self.response {
            line.push_str(&format!(" | last: {}", response.text));
        }
        line
    }

    /// History panel, newest first.
    pub fn history_lines(&self) -> Vec<String> {
        if self.history.is_empty() {
            return vec!["No commands yet".to_string()];
        }
        self.history.newest_first().map(history_line).collect()
    }

    fn assistant_label(&self) -> String {
        let state = if self.awake { "Awake" } else { "Sleeping" };
        match self.mode {
            Some(mode) => format!("{state} ({mode} mode)"),
            None => state.to_string(),
        }
    }
}

fn connection_label(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connected => "Connected",
        ConnectionState::Connecting => "Connecting",
        ConnectionState::Disconnected => "Disconnected",
    }
}

fn metrics_label(metrics: &Metrics) -> String {
    let percent = |v: Option<u8>| v.map_or_else(|| "--".to_string(), |v| format!("{v}%"));
    let battery = match metrics.battery_level() {
        Some(BatteryLevel::Critical) => format!("{} critical", percent(metrics.battery)),
        Some(BatteryLevel::Warning) => format!("{} low", percent(metrics.battery)),
        _ => percent(metrics.battery),
    };
    format!(
        "battery {battery}, cpu {}, ram {}, disk {}",
        percent(metrics.cpu),
        percent(metrics.ram),
        percent(metrics.disk)
    )
}

fn history_line(entry: &HistoryEntry) -> String {
    let tag = match entry.kind {
        Category::Voice => "voice",
        Category::Gesture => "gesture",
        Category::System => "system",
    };
    format!("{} [{tag}] {}", clock(entry.timestamp_ms), entry.text)
}

/// Local `HH:MM:SS` from epoch milliseconds.
fn clock(timestamp_ms: u64) -> String {
    i64::try_from(timestamp_ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_uses_local_time() {
        let ms = 1_700_000_009_999;
        let expected = DateTime::from_timestamp_millis(ms as i64)
            .unwrap()
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string();
        assert_eq!(clock(ms), expected);

        let shown = clock(ms);
        assert_eq!(shown.len(), 8);
        assert!(shown.ends_with(":29"), "{shown}");
    }

    #[test]
    fn clock_out_of_range() {
        assert_eq!(clock(u64::MAX), "--:--:--");
    }

    #[test]
    fn battery_buckets_in_labels() {
        let mut metrics = Metrics {
            battery: Some(15),
            ..Default::default()
        };
        assert_eq!(
            metrics_label(&metrics),
            "battery 15% critical, cpu --, ram --, disk --"
        );
        metrics.battery = Some(35);
        assert!(metrics_label(&metrics).starts_with("battery 35% low"));
        metrics.battery = Some(90);
        assert!(metrics_label(&metrics).starts_with("battery 90%,"));
    }

    #[test]
    fn view_tracks_updates() {
        let mut view = View::new(50);
        view.apply(Render::Connection(ConnectionState::Connected));
        let line = view.apply(Render::Assistant {
            awake: true,
            mode: Some(Mode::Gesture),
        });
        assert_eq!(line, "[assistant] Awake (gesture mode)");

        view.apply(Render::HistoryAppended(HistoryEntry::new(Category::Voice, "mute", 0)));
        view.apply(Render::HistoryAppended(HistoryEntry::new(Category::Gesture, "swipe", 1000)));
        assert_eq!(
            view.history_lines(),
            vec![
                format!("{} [gesture] swipe", clock(1000)),
                format!("{} [voice] mute", clock(0)),
            ]
        );

        let line = view.apply(Render::Response(Response {
            text: "Invalid JSON format".into(),
            is_error: true,
        }));
        assert_eq!(line, "[error] Invalid JSON format");
        assert!(view.status_line().starts_with("Connected | Awake (gesture mode)"));

        view.apply(Render::HistoryCleared);
        assert_eq!(view.history_lines(), vec!["No commands yet"]);
    }
}
