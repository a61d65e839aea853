//! Today's window and the printed agenda.

use std::io::Write;

use chrono::{DateTime, TimeZone};

use crate::ports::calendar::{Event, TimeWindow};

/// From midnight of `now`'s date, as seen in `now`'s own time zone, to
/// midnight of the next day. Both bounds carry a `Z` suffix.
#[must_use]
pub fn today<Tz: TimeZone>(now: &DateTime<Tz>) -> TimeWindow {
    let day = now.date_naive();
    let next = day.succ_opt().unwrap_or(day);
    TimeWindow { min: format!("{day}T00:00:00Z"), max: format!("{next}T00:00:00Z") }
}

/// Renders when an event starts, e.g. `Mon, 3:04PM` or `All Day`.
///
/// # Errors
///
/// Returns an error if the start timestamp is not RFC 3339.
pub fn start_label(event: &Event) -> Result<String, String> {
    match event.start.date_time.as_deref().filter(|s| !s.is_empty()) {
        Some(start) => DateTime::parse_from_rfc3339(start)
            .map(|start| start.format("%a, %-I:%M%p").to_string())
            .map_err(|e| format!("Unable to parse event start {start:?}: {e}")),
        None => Ok("All Day".to_string()),
    }
}

/// Writes one line per event, aligning the summaries of this batch only.
///
/// # Errors
///
/// Returns an error if a start time is malformed or writing fails.
pub fn write(out: &mut dyn Write, events: &[Event]) -> Result<(), String> {
    let rows = events
        .iter()
        .map(|event| -> Result<(String, String), String> {
            Ok((start_label(event)?, event.summary.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let width = rows.iter().map(|(when, _)| when.len()).max().unwrap_or(0);

    for (when, summary) in &rows {
        writeln!(out, "{when:<width$}  {summary}").map_err(|e| e.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::calendar::EventStart;
    use chrono::{FixedOffset, Utc};

    fn event(start: Option<&str>, summary: &str) -> Event {
        Event {
            summary: summary.into(),
            start: EventStart { date_time: start.map(ToString::to_string) },
        }
    }

    #[test]
    fn window_spans_one_day() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 18, 30, 0).unwrap();
        let window = today(&now);
        assert_eq!(window.min, "2024-12-31T00:00:00Z");
        assert_eq!(window.max, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn window_uses_the_clock_zone_date() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        let evening = eastern.with_ymd_and_hms(2024, 3, 4, 22, 0, 0).unwrap();
        let window = today(&evening);
        assert_eq!(window.min, "2024-03-04T00:00:00Z");
        assert_eq!(window.max, "2024-03-05T00:00:00Z");
    }

    #[test]
    fn labels_timed_and_all_day_events() {
        assert_eq!(start_label(&event(Some("2024-03-04T13:05:00Z"), "x")).unwrap(), "Mon, 1:05PM");
        assert_eq!(
            start_label(&event(Some("2024-03-04T09:00:00-05:00"), "x")).unwrap(),
            "Mon, 9:00AM"
        );
        assert_eq!(start_label(&event(None, "x")).unwrap(), "All Day");
        assert!(start_label(&event(Some("noon"), "x")).is_err());
    }

    #[test]
    fn aligns_summaries() {
        let mut out = Vec::new();
        write(
            &mut out,
            &[
                event(Some("2024-03-04T13:00:00Z"), "Another thing is going to happen"),
                event(None, "All day event"),
            ],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Mon, 1:00PM  Another thing is going to happen\nAll Day      All day event\n"
        );
    }

    #[test]
    fn nothing_to_print() {
        let mut out = Vec::new();
        write(&mut out, &[]).unwrap();
        assert!(out.is_empty());
    }
}
