//! Output formatting helpers for the `coros` binary.

use colored::Colorize;
use coros_client::ActivitySummary;
use coros_client::utils::{display_start, format_distance, format_duration};

struct Row {
    index: String,
    start: String,
    name: String,
    sport: String,
    distance: String,
    duration: String,
    id: String,
}

impl Row {
    fn new(index: usize, a: &ActivitySummary) -> Self {
        Self {
            index: index.to_string(),
            start: display_start(a.date, a.start_time),
            name: a.name.clone(),
            sport: a.sport_type.to_string(),
            distance: format_distance(a.distance),
            duration: format_duration(a.duration),
            id: a.id.clone(),
        }
    }
}

fn width<'a>(header: &str, cells: impl Iterator<Item = &'a String>) -> usize {
    cells
        .map(|c| c.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

/// Render activities as an aligned table, numbered from 1.
pub fn activity_table(activities: &[ActivitySummary]) -> String {
    let rows: Vec<Row> = activities
        .iter()
        .enumerate()
        .map(|(i, a)| Row::new(i + 1, a))
        .collect();

    let w_idx = width("#", rows.iter().map(|r| &r.index));
    let w_start = width("Date", rows.iter().map(|r| &r.start));
    let w_name = width("Name", rows.iter().map(|r| &r.name));
    let w_sport = width("Type", rows.iter().map(|r| &r.sport));
    let w_dist = width("Distance", rows.iter().map(|r| &r.distance));
    let w_dur = width("Time", rows.iter().map(|r| &r.duration));

    let header = format!(
        "{:>w_idx$}  {:<w_start$}  {:<w_name$}  {:<w_sport$}  {:>w_dist$}  {:>w_dur$}  ID",
        "#", "Date", "Name", "Type", "Distance", "Time"
    );
    let mut out = format!("{}\n", header.bold().magenta());
    for r in &rows {
        out.push_str(&format!(
            "{}  {:<w_start$}  {}  {}  {:>w_dist$}  {:>w_dur$}  {}\n",
            format!("{:>w_idx$}", r.index).dimmed(),
            r.start,
            format!("{:<w_name$}", r.name).cyan(),
            format!("{:<w_sport$}", r.sport).green(),
            r.distance,
            r.duration,
            r.id.dimmed(),
        ));
    }
    out
}

/// One line per activity for the selection prompt.
pub fn selection_label(a: &ActivitySummary) -> String {
    format!(
        "{} - {} ({})",
        display_start(a.date, a.start_time),
        a.name,
        a.sport_type
    )
}

pub fn session_notice() -> String {
    "Note: logging in signs out any other COROS web session of this account."
        .yellow()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coros_client::SportType;
    use coros_client::utils::{parse_vendor_date, timestamp_to_utc};

    fn activity(id: &str, name: &str) -> ActivitySummary {
        ActivitySummary {
            id: id.into(),
            name: name.into(),
            start_time: timestamp_to_utc(0),
            date: parse_vendor_date(20250601),
            distance: 5000.0,
            duration: 1500.0,
            sport_type: SportType(100),
        }
    }

    #[test]
    fn table_has_header_and_one_line_per_activity() {
        let table = activity_table(&[activity("123", "Morning Run"), activity("122", "Jog")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Distance"));
        assert!(lines[1].contains("Morning Run"));
        assert!(lines[1].contains("2025-06-01"));
        assert!(lines[1].contains("5.00 km"));
        assert!(lines[2].contains("122"));
    }

    #[test]
    fn empty_table_is_header_only() {
        assert_eq!(activity_table(&[]).lines().count(), 1);
    }

    #[test]
    fn selection_label_names_sport() {
        assert_eq!(
            selection_label(&activity("1", "Morning Run")),
            "2025-06-01 - Morning Run (Run)"
        );
    }
}
