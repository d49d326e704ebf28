// CSV parsing for the four dashboard tables.

use crate::error::DataSourceError;
use chrono::NaiveDate;
use core_types::{
    parse_date, CalendarEntry, RosterEntry, SessionRecord, WellnessRecord, DISTANCE_ZONES,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;

// ---------------------------------------------------------------------------
// Required columns (each entry lists the accepted spellings)
// ---------------------------------------------------------------------------

const GPS_COLUMNS: &[&[&str]] = &[
    &["Player Name"],
    &["Session Date"],
    &["Drill Title"],
    &["Total Distance"],
    &["Metres Per Minute"],
    &["Maximum Speed"],
    &["Explosive Distance"],
    &["Session Time(mins)"],
    &["Distance Zone 1"],
    &["Distance Zone 2"],
    &["Distance Zone 3"],
    &["Distance Zone 4"],
    &["Distance Zone 5"],
    &["Distance Zone 6"],
];

const WELLNESS_COLUMNS: &[&[&str]] = &[
    &["Player Name", "Players Name"],
    &["Session Date"],
    &["Energy"],
    &["Soreness"],
    &["Sleep Quality"],
    &["Stress"],
    &["Total Score"],
];

const ROSTER_COLUMNS: &[&[&str]] = &[
    &["Player Name"],
    &["DOB"],
    &["Position"],
    &["Player Image"],
    &["International Image"],
    &["Max Game High Speed Running"],
    &["Max Game Total Distance"],
];

const CALENDAR_COLUMNS: &[&[&str]] = &[&["Date", "Session Date"], &["Activity"]];

/// Upper bound of the wellness questionnaire scale.
const WELLNESS_SCALE_MAX: f64 = 10.0;

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawSession {
    #[serde(rename = "Player Name")]
    player: String,
    #[serde(rename = "Session Date")]
    session_date: String,
    #[serde(rename = "Drill Title")]
    drill: String,
    #[serde(rename = "Total Distance")]
    total_distance: f64,
    #[serde(rename = "Metres Per Minute")]
    metres_per_minute: f64,
    #[serde(rename = "Maximum Speed")]
    max_speed: f64,
    #[serde(rename = "Explosive Distance")]
    explosive_distance: f64,
    #[serde(rename = "Session Time(mins)")]
    session_minutes: f64,
    #[serde(rename = "Distance Zone 1")]
    zone1: f64,
    #[serde(rename = "Distance Zone 2")]
    zone2: f64,
    #[serde(rename = "Distance Zone 3")]
    zone3: f64,
    #[serde(rename = "Distance Zone 4")]
    zone4: f64,
    #[serde(rename = "Distance Zone 5")]
    zone5: f64,
    #[serde(rename = "Distance Zone 6")]
    zone6: f64,
}

#[derive(Debug, Deserialize)]
struct RawWellness {
    #[serde(rename = "Player Name", alias = "Players Name")]
    player: String,
    #[serde(rename = "Session Date")]
    session_date: String,
    #[serde(rename = "Energy")]
    energy: f64,
    #[serde(rename = "Soreness")]
    soreness: f64,
    #[serde(rename = "Sleep Quality")]
    sleep_quality: f64,
    #[serde(rename = "Stress")]
    stress: f64,
    #[serde(rename = "Total Score")]
    total_score: f64,
}

#[derive(Debug, Deserialize)]
struct RawRoster {
    #[serde(rename = "Player Name")]
    player: String,
    #[serde(rename = "DOB")]
    date_of_birth: String,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "Player Image")]
    player_image: String,
    #[serde(rename = "International Image")]
    international_image: String,
    #[serde(rename = "Max Game High Speed Running")]
    max_game_high_speed_running: f64,
    #[serde(rename = "Max Game Total Distance")]
    max_game_total_distance: f64,
    #[serde(rename = "Max Game Speed", default)]
    max_game_speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCalendar {
    #[serde(rename = "Date", alias = "Session Date")]
    date: String,
    #[serde(rename = "Activity")]
    activity: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Wraps a reader and the display name of its source file.
struct TableReader<R: Read> {
    reader: csv::Reader<R>,
    path: String,
}

impl<R: Read> TableReader<R> {
    fn open(rdr: R, path: &str, required: &[&[&str]]) -> Result<Self, DataSourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let headers = reader.headers().map_err(|source| DataSourceError::Csv {
            path: path.to_string(),
            source,
        })?;

        for spellings in required {
            if !spellings.iter().any(|name| headers.iter().any(|h| h == *name)) {
                return Err(DataSourceError::MissingColumn {
                    path: path.to_string(),
                    column: spellings[0].to_string(),
                });
            }
        }

        Ok(Self {
            reader,
            path: path.to_string(),
        })
    }

    /// Deserializes every row, passing each to `convert` with its 1-based line number.
    fn rows<T, U, F>(mut self, mut convert: F) -> Result<Vec<U>, DataSourceError>
    where
        T: for<'de> Deserialize<'de>,
        F: FnMut(T, usize, &str) -> Result<U, DataSourceError>,
    {
        let mut out = Vec::new();
        for (index, result) in self.reader.deserialize::<T>().enumerate() {
            let raw = result.map_err(|source| DataSourceError::Csv {
                path: self.path.clone(),
                source,
            })?;
            // Line 1 is the header.
            out.push(convert(raw, index + 2, &self.path)?);
        }
        Ok(out)
    }
}

fn date_field(
    raw: &str,
    column: &str,
    line: usize,
    path: &str,
) -> Result<NaiveDate, DataSourceError> {
    parse_date(raw).map_err(|e| DataSourceError::InvalidValue {
        path: path.to_string(),
        line,
        message: format!("{column}: {e}"),
    })
}

fn invalid(path: &str, line: usize, message: String) -> DataSourceError {
    DataSourceError::InvalidValue {
        path: path.to_string(),
        line,
        message,
    }
}

fn check_scale(value: f64, column: &str, line: usize, path: &str) -> Result<(), DataSourceError> {
    if value.is_finite() && (0.0..=WELLNESS_SCALE_MAX).contains(&value) {
        Ok(())
    } else {
        Err(invalid(
            path,
            line,
            format!("{column} must be between 0 and {WELLNESS_SCALE_MAX}, got {value}"),
        ))
    }
}

/// GPS measurements are finite and never negative.
fn check_measure(value: f64, column: &str, line: usize, path: &str) -> Result<(), DataSourceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(
            path,
            line,
            format!("{column} must be a non-negative number, got {value}"),
        ))
    }
}

// ---------------------------------------------------------------------------
// Reader-based parsers
// ---------------------------------------------------------------------------

/// Parses the GPS export and derives high-speed running for every row.
pub fn parse_sessions<R: Read>(rdr: R, path: &str) -> Result<Vec<SessionRecord>, DataSourceError> {
    TableReader::open(rdr, path, GPS_COLUMNS)?.rows(|raw: RawSession, line, path| {
        for (column, value) in [
            ("Total Distance", raw.total_distance),
            ("Metres Per Minute", raw.metres_per_minute),
            ("Maximum Speed", raw.max_speed),
            ("Explosive Distance", raw.explosive_distance),
            ("Session Time(mins)", raw.session_minutes),
        ] {
            check_measure(value, column, line, path)?;
        }
        let zone_distances: [f64; DISTANCE_ZONES] =
            [raw.zone1, raw.zone2, raw.zone3, raw.zone4, raw.zone5, raw.zone6];
        for (zone, value) in zone_distances.iter().enumerate() {
            check_measure(*value, &format!("Distance Zone {}", zone + 1), line, path)?;
        }
        Ok(SessionRecord {
            session_date: date_field(&raw.session_date, "Session Date", line, path)?,
            player: raw.player,
            drill: raw.drill,
            total_distance: raw.total_distance,
            metres_per_minute: raw.metres_per_minute,
            max_speed: raw.max_speed,
            explosive_distance: raw.explosive_distance,
            session_minutes: raw.session_minutes,
            high_speed_running: SessionRecord::derive_high_speed_running(&zone_distances),
            zone_distances,
        })
    })
}

pub fn parse_wellness<R: Read>(rdr: R, path: &str) -> Result<Vec<WellnessRecord>, DataSourceError> {
    TableReader::open(rdr, path, WELLNESS_COLUMNS)?.rows(|raw: RawWellness, line, path| {
        check_scale(raw.energy, "Energy", line, path)?;
        check_scale(raw.soreness, "Soreness", line, path)?;
        check_scale(raw.sleep_quality, "Sleep Quality", line, path)?;
        check_scale(raw.stress, "Stress", line, path)?;
        Ok(WellnessRecord {
            session_date: date_field(&raw.session_date, "Session Date", line, path)?,
            player: raw.player,
            energy: raw.energy,
            soreness: raw.soreness,
            sleep_quality: raw.sleep_quality,
            stress: raw.stress,
            total_score: raw.total_score,
        })
    })
}

/// Parses the roster. Player names are the key of the table and must be unique.
pub fn parse_roster<R: Read>(rdr: R, path: &str) -> Result<Vec<RosterEntry>, DataSourceError> {
    let entries = TableReader::open(rdr, path, ROSTER_COLUMNS)?.rows(|raw: RawRoster, line, path| {
        Ok(RosterEntry {
            date_of_birth: date_field(&raw.date_of_birth, "DOB", line, path)?,
            player: raw.player,
            position: raw.position,
            player_image: raw.player_image,
            international_image: raw.international_image,
            max_game_high_speed_running: raw.max_game_high_speed_running,
            max_game_total_distance: raw.max_game_total_distance,
            max_game_speed: raw.max_game_speed,
        })
    })?;

    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.player.as_str()) {
            return Err(DataSourceError::DuplicatePlayer {
                path: path.to_string(),
                player: entry.player.clone(),
            });
        }
    }
    Ok(entries)
}

pub fn parse_calendar<R: Read>(rdr: R, path: &str) -> Result<Vec<CalendarEntry>, DataSourceError> {
    TableReader::open(rdr, path, CALENDAR_COLUMNS)?.rows(|raw: RawCalendar, line, path| {
        Ok(CalendarEntry {
            date: date_field(&raw.date, "Date", line, path)?,
            activity: raw.activity,
        })
    })
}
