use crate::error::DataSourceError;
use core_types::{CalendarEntry, DateRange, RosterEntry, SessionRecord, WellnessRecord};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// The four tables of one dashboard session. Read-only and cheap to clone.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub calendar: Arc<Vec<CalendarEntry>>,
    pub sessions: Arc<Vec<SessionRecord>>,
    pub wellness: Arc<Vec<WellnessRecord>>,
    pub roster: Arc<Vec<RosterEntry>>,
}

impl Snapshot {
    /// Assembles a snapshot, checking the references between tables.
    ///
    /// Every wellness row must name a rostered player. GPS rows for unknown
    /// players are kept; their roster-based KPIs will report n/a.
    pub fn assemble(
        calendar: Arc<Vec<CalendarEntry>>,
        sessions: Arc<Vec<SessionRecord>>,
        wellness: Arc<Vec<WellnessRecord>>,
        roster: Arc<Vec<RosterEntry>>,
        wellness_path: &str,
    ) -> Result<Self, DataSourceError> {
        let known: HashSet<&str> = roster.iter().map(|r| r.player.as_str()).collect();

        if let Some((index, row)) = wellness
            .iter()
            .enumerate()
            .find(|(_, row)| !known.contains(row.player.as_str()))
        {
            return Err(DataSourceError::UnknownPlayer {
                path: wellness_path.to_string(),
                line: index + 2,
                player: row.player.clone(),
            });
        }

        let unrostered: BTreeSet<&str> = sessions
            .iter()
            .map(|s| s.player.as_str())
            .filter(|player| !known.contains(player))
            .collect();
        for player in unrostered {
            tracing::warn!(player, "GPS sessions reference a player missing from the roster.");
        }

        Ok(Self {
            calendar,
            sessions,
            wellness,
            roster,
        })
    }

    pub fn roster_entry(&self, player: &str) -> Option<&RosterEntry> {
        self.roster.iter().find(|entry| entry.player == player)
    }

    /// Roster names in file order.
    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.roster.iter().map(|entry| entry.player.as_str())
    }

    /// The full span of GPS session dates, used as the default report window.
    pub fn session_span(&self) -> Option<DateRange> {
        DateRange::spanning(self.sessions.iter().map(|s| s.session_date))
    }
}
