use crate::error::DataSourceError;
use crate::loader::{parse_calendar, parse_roster, parse_sessions, parse_wellness};
use crate::snapshot::Snapshot;
use configuration::DataSources;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

/// Identity of a file's contents as far as the cache is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> Result<Self, DataSourceError> {
        let metadata = std::fs::metadata(path).map_err(|source| DataSourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

type Parser<T> = fn(BufReader<File>, &str) -> Result<Vec<T>, DataSourceError>;

/// One memoized table. The lock is held across a reload, so concurrent
/// callers wait for the in-flight parse instead of starting their own.
struct SourceSlot<T> {
    path: PathBuf,
    parse: Parser<T>,
    state: Mutex<Option<(Fingerprint, Arc<Vec<T>>)>>,
}

impl<T> SourceSlot<T> {
    fn new(path: PathBuf, parse: Parser<T>) -> Self {
        Self {
            path,
            parse,
            state: Mutex::new(None),
        }
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }

    fn get(&self) -> Result<Arc<Vec<T>>, DataSourceError> {
        // A panic mid-reload leaves the previous (still valid) entry behind.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let fingerprint = Fingerprint::of(&self.path)?;

        if let Some((cached, table)) = state.as_ref() {
            if *cached == fingerprint {
                return Ok(Arc::clone(table));
            }
        }

        let file = File::open(&self.path).map_err(|source| DataSourceError::Io {
            path: self.display(),
            source,
        })?;
        let table = Arc::new((self.parse)(BufReader::new(file), &self.display())?);
        tracing::info!(path = %self.path.display(), rows = table.len(), "Loaded data source.");

        *state = Some((fingerprint, Arc::clone(&table)));
        Ok(table)
    }
}

/// Memoizes the four tables by file identity (path, modification time, size).
///
/// `snapshot()` re-parses only the files that changed since the previous call;
/// untouched files are handed out as the same shared `Arc`.
pub struct SnapshotCache {
    calendar: SourceSlot<core_types::CalendarEntry>,
    sessions: SourceSlot<core_types::SessionRecord>,
    wellness: SourceSlot<core_types::WellnessRecord>,
    roster: SourceSlot<core_types::RosterEntry>,
}

impl SnapshotCache {
    pub fn new(sources: &DataSources) -> Self {
        Self {
            calendar: SourceSlot::new(sources.calendar.clone(), parse_calendar),
            sessions: SourceSlot::new(sources.gps.clone(), parse_sessions),
            wellness: SourceSlot::new(sources.wellness.clone(), parse_wellness),
            roster: SourceSlot::new(sources.roster.clone(), parse_roster),
        }
    }

    /// Returns the current snapshot, loading whatever is missing or stale.
    pub fn snapshot(&self) -> Result<Snapshot, DataSourceError> {
        let roster = self.roster.get()?;
        let calendar = self.calendar.get()?;
        let sessions = self.sessions.get()?;
        let wellness = self.wellness.get()?;
        Snapshot::assemble(calendar, sessions, wellness, roster, &self.wellness.display())
    }
}
