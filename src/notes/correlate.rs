use super::OperatorNote;
use crate::events::Event;
use chrono::Duration;

/// Notes falling inside an event's span widened by a margin on both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct EventNotes<'a> {
    pub event: &'a Event,
    pub notes: Vec<&'a OperatorNote>,
}

pub fn correlate<'a>(
    events: &'a [Event],
    notes: &'a [OperatorNote],
    margin_minutes: i64,
) -> Vec<EventNotes<'a>> {
    let margin = Duration::minutes(margin_minutes);
    events
        .iter()
        .map(|event| {
            let from = event.start - margin;
            let to = event.end + margin;
            let notes = notes
                .iter()
                .filter(|n| n.timestamp >= from && n.timestamp <= to)
                .collect();
            EventNotes { event, notes }
        })
        .collect()
}
