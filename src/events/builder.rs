//! Merge consecutive anomalous windows into events.

use super::Event;
use crate::features::{Verdict, Window, WindowFrame};
use chrono::{DateTime, Utc};

struct OpenEvent {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    severity: f64,
    windows: usize,
}

impl OpenEvent {
    fn open(window: &Window<Verdict, Verdict>) -> Self {
        Self {
            start: window.start,
            end: window.start,
            severity: 0.0,
            windows: 0,
        }
    }

    fn extend(&mut self, window: &Window<Verdict, Verdict>) {
        self.end = window.start;
        self.severity += window.behavior.score;
        self.windows += 1;
    }

    fn close(self) -> Event {
        let minutes = (self.end - self.start).num_seconds() / 60;
        Event {
            start: self.start,
            end: self.end,
            duration_minutes: minutes.max(1),
            severity: self.severity,
            windows: self.windows,
            cluster: None,
        }
    }
}

/// Scan windows in order; either flag opens or extends an event, the first
/// unflagged window closes it.
pub fn build_events(frame: &WindowFrame<Verdict, Verdict>) -> Vec<Event> {
    let mut events = Vec::new();
    let mut current: Option<OpenEvent> = None;

    for window in &frame.windows {
        if window.is_anomalous() {
            current
                .get_or_insert_with(|| OpenEvent::open(window))
                .extend(window);
        } else if let Some(open) = current.take() {
            events.push(open.close());
        }
    }
    if let Some(open) = current.take() {
        events.push(open.close());
    }

    tracing::debug!(windows = frame.len(), events = events.len(), "built events");
    events
}
