//! Selection filters. All of them are pure and total: a selection that
//! matches nothing returns an empty table, never an error.

use chrono::NaiveDate;
use core_types::{CalendarEntry, DateRange, DrillAllowList, PlayerRecord, SessionRecord};

/// Keeps rows dated within `[start, end]`. `start > end` keeps nothing.
pub fn filter_sessions<T>(rows: &[T], start: NaiveDate, end: NaiveDate) -> Vec<T>
where
    T: PlayerRecord + Clone,
{
    let range = DateRange::new(start, end);
    rows.iter()
        .filter(|row| range.contains(row.date()))
        .cloned()
        .collect()
}

/// Keeps rows whose player name matches exactly (case-sensitive).
pub fn filter_by_player<T>(rows: &[T], player: &str) -> Vec<T>
where
    T: PlayerRecord + Clone,
{
    rows.iter()
        .filter(|row| row.player() == player)
        .cloned()
        .collect()
}

/// Drops GPS rows whose drill is not on the allow-list.
pub fn filter_by_drills(rows: &[SessionRecord], allow: &DrillAllowList) -> Vec<SessionRecord> {
    rows.iter()
        .filter(|row| allow.allows(&row.drill))
        .cloned()
        .collect()
}

pub fn filter_calendar(entries: &[CalendarEntry], range: DateRange) -> Vec<CalendarEntry> {
    entries
        .iter()
        .filter(|entry| range.contains(entry.date))
        .cloned()
        .collect()
}
