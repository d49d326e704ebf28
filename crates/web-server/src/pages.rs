//! Page assembly shared by the HTTP handlers and the command line.

use analytics::{AnalyticsEngine, PlayerReport, PlayerSelection, Tables, TeamReport, TeamSelection};
use chrono::NaiveDate;
use core_types::{Achievement, DateRange, DrillAllowList, RosterEntry, ACHIEVEMENTS, CLUB_HISTORY};
use datastore::Snapshot;
use serde::Serialize;

use crate::error::AppError;

pub fn tables(snapshot: &Snapshot) -> Tables<'_> {
    Tables {
        calendar: &snapshot.calendar,
        sessions: &snapshot.sessions,
        wellness: &snapshot.wellness,
        roster: &snapshot.roster,
    }
}

/// The window a report covers. Missing bounds default to the span of the GPS
/// data; with no GPS data at all they default to `today`.
pub fn resolve_range(
    snapshot: &Snapshot,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> DateRange {
    let span = snapshot
        .session_span()
        .unwrap_or_else(|| DateRange::new(today, today));
    DateRange::new(from.unwrap_or(span.start), to.unwrap_or(span.end))
}

#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub history: &'static [&'static str],
    pub achievements: &'static [Achievement],
}

pub fn home_page() -> HomePage {
    HomePage {
        history: CLUB_HISTORY,
        achievements: ACHIEVEMENTS,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerListing {
    pub player: String,
    pub position: String,
    pub player_image: String,
}

impl From<&RosterEntry> for PlayerListing {
    fn from(entry: &RosterEntry) -> Self {
        Self {
            player: entry.player.clone(),
            position: entry.position.clone(),
            player_image: entry.player_image.clone(),
        }
    }
}

pub fn player_listing(snapshot: &Snapshot) -> Vec<PlayerListing> {
    snapshot.roster.iter().map(PlayerListing::from).collect()
}

/// `drills` replaces the configured allow-list when given.
pub fn team_page(
    snapshot: &Snapshot,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    drills: DrillAllowList,
    today: NaiveDate,
) -> TeamReport {
    let selection = TeamSelection {
        range: resolve_range(snapshot, from, to, today),
        drills,
    };
    AnalyticsEngine::new().team_report(&tables(snapshot), &selection)
}

/// A player must be on the roster or have GPS rows to get a page at all.
pub fn player_page(
    snapshot: &Snapshot,
    player: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<PlayerReport, AppError> {
    let known = snapshot.roster_entry(player).is_some()
        || snapshot.sessions.iter().any(|s| s.player == player);
    if !known {
        return Err(AppError::NotFound(format!("player '{player}'")));
    }
    let selection = PlayerSelection {
        player: player.to_string(),
        range: resolve_range(snapshot, from, to, today),
        today,
    };
    Ok(AnalyticsEngine::new().player_report(&tables(snapshot), &selection))
}
