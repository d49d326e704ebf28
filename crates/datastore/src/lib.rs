//! # Pitchside Datastore
//!
//! This crate is the data loader of the dashboard. It reads the four flat files
//! (calendar, GPS sessions, wellness, roster) into typed, immutable tables.
//!
//! ## Architectural Principles
//!
//! - **Fail Whole:** A missing file, a missing column or a value that breaks a table
//!   invariant fails the load with a `DataSourceError`. There is no partial recovery.
//! - **Memoized by Source:** `SnapshotCache` keys each table on its file identity and
//!   re-parses a file only after it changes on disk.
//! - **Read-Only Sharing:** Tables are handed out behind `Arc`, so concurrent reports
//!   share one copy.
//!
//! ## Public API
//!
//! - `SnapshotCache`: The memoized entry point used by the CLI and the web server.
//! - `Snapshot`: The four tables of one dashboard session.
//! - `parse_*`: Reader-based parsers for each table.
//! - `DataSourceError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod cache;
pub mod error;
pub mod loader;
pub mod snapshot;

// Re-export the key components to create a clean, public-facing API.
pub use cache::SnapshotCache;
pub use error::DataSourceError;
pub use loader::{parse_calendar, parse_roster, parse_sessions, parse_wellness};
pub use snapshot::Snapshot;
