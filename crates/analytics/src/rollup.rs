//! Typed group-by rollups over GPS rows.
//!
//! Each rollup is a group key, one `Accumulator` per key, and an output row.
//! Groups are kept in a `BTreeMap`, so output is ordered by key and
//! repeated runs over the same rows are identical.

use core_types::SessionRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Running sums, means and maxima for one group of GPS rows.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    rows: usize,
    total_distance: f64,
    metres_per_minute: f64,
    max_speed: f64,
    explosive_distance: f64,
    session_minutes: f64,
    high_speed_running: f64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            rows: 0,
            total_distance: 0.0,
            metres_per_minute: 0.0,
            max_speed: f64::NEG_INFINITY,
            explosive_distance: 0.0,
            session_minutes: 0.0,
            high_speed_running: 0.0,
        }
    }
}

impl Accumulator {
    fn push(&mut self, row: &SessionRecord) {
        self.rows += 1;
        self.total_distance += row.total_distance;
        self.metres_per_minute += row.metres_per_minute;
        self.max_speed = self.max_speed.max(row.max_speed);
        self.explosive_distance += row.explosive_distance;
        self.session_minutes += row.session_minutes;
        self.high_speed_running += row.high_speed_running;
    }

    /// `None` for an empty group.
    fn mean_metres_per_minute(&self) -> Option<f64> {
        (self.rows > 0).then(|| self.metres_per_minute / self.rows as f64)
    }

    fn max_speed(&self) -> Option<f64> {
        (self.rows > 0 && self.max_speed.is_finite()).then_some(self.max_speed)
    }
}

fn group_by<K, F>(rows: &[SessionRecord], key: F) -> BTreeMap<K, Accumulator>
where
    K: Ord,
    F: Fn(&SessionRecord) -> K,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

/// Totals over the whole filtered set, independent of any grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionTotals {
    pub rows: usize,
    pub total_distance: f64,
    pub mean_metres_per_minute: Option<f64>,
    pub max_speed: Option<f64>,
}

pub fn session_totals(rows: &[SessionRecord]) -> SessionTotals {
    let mut acc = Accumulator::default();
    rows.iter().for_each(|row| acc.push(row));
    SessionTotals {
        rows: acc.rows,
        total_distance: acc.total_distance,
        mean_metres_per_minute: acc.mean_metres_per_minute(),
        max_speed: acc.max_speed(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRollup {
    pub player: String,
    /// Number of GPS rows (drill segments) in the window.
    pub rows: usize,
    pub total_distance: f64,
    pub max_speed: Option<f64>,
    pub mean_metres_per_minute: Option<f64>,
    pub explosive_distance: f64,
    pub session_minutes: f64,
    pub high_speed_running: f64,
}

/// One row per player present in `rows`, ordered by name.
pub fn player_rollups(rows: &[SessionRecord]) -> Vec<PlayerRollup> {
    group_by(rows, |row| row.player.clone())
        .into_iter()
        .map(|(player, acc)| PlayerRollup {
            player,
            rows: acc.rows,
            total_distance: acc.total_distance,
            max_speed: acc.max_speed(),
            mean_metres_per_minute: acc.mean_metres_per_minute(),
            explosive_distance: acc.explosive_distance,
            session_minutes: acc.session_minutes,
            high_speed_running: acc.high_speed_running,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillRollup {
    pub drill: String,
    pub rows: usize,
    pub total_distance: f64,
    pub mean_metres_per_minute: Option<f64>,
    pub max_speed: Option<f64>,
}

pub fn drill_rollups(rows: &[SessionRecord]) -> Vec<DrillRollup> {
    group_by(rows, |row| row.drill.clone())
        .into_iter()
        .map(|(drill, acc)| DrillRollup {
            drill,
            rows: acc.rows,
            total_distance: acc.total_distance,
            mean_metres_per_minute: acc.mean_metres_per_minute(),
            max_speed: acc.max_speed(),
        })
        .collect()
}

/// One populated cell of the player × drill matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossRollup {
    pub player: String,
    pub drill: String,
    pub total_distance: f64,
    pub mean_metres_per_minute: Option<f64>,
}

/// Player-by-drill matrix. Combinations with no rows have no cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDrillMatrix {
    pub players: Vec<String>,
    pub drills: Vec<String>,
    pub cells: Vec<CrossRollup>,
}

impl PlayerDrillMatrix {
    pub fn cell(&self, player: &str, drill: &str) -> Option<&CrossRollup> {
        self.cells
            .iter()
            .find(|cell| cell.player == player && cell.drill == drill)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub fn player_drill_matrix(rows: &[SessionRecord]) -> PlayerDrillMatrix {
    let cells: Vec<CrossRollup> = group_by(rows, |row| (row.player.clone(), row.drill.clone()))
        .into_iter()
        .map(|((player, drill), acc)| CrossRollup {
            player,
            drill,
            total_distance: acc.total_distance,
            mean_metres_per_minute: acc.mean_metres_per_minute(),
        })
        .collect();

    let mut players: Vec<String> = cells.iter().map(|c| c.player.clone()).collect();
    players.dedup();
    let mut drills: Vec<String> = cells.iter().map(|c| c.drill.clone()).collect();
    drills.sort();
    drills.dedup();

    PlayerDrillMatrix {
        players,
        drills,
        cells,
    }
}
