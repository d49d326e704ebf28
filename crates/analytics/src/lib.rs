//! # Pitchside Analytics Engine
//!
//! This crate turns loaded GPS, wellness, roster and calendar tables into the
//! team and player reports shown by the CLI and the HTTP API.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** It has no knowledge of files, caches or servers. It depends
//!   only on `core-types` and works on borrowed slices.
//! - **Stateless Calculation:** The `AnalyticsEngine` holds no state. The same
//!   tables and selection always produce the same report.
//! - **Isolated Sections:** Every report section carries its own `Section` state,
//!   so one undefined ratio or missing player never blanks the whole page.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`, `Tables`, `TeamSelection`, `PlayerSelection`: the entry points.
//! - `TeamReport`, `PlayerReport`: the structured outputs.
//! - `Metric`, `Section`: how undefined values and empty selections are represented.
//! - The `filter` and `rollup` modules for callers that need a single stage.

pub mod engine;
pub mod error;
pub mod filter;
pub mod metric;
pub mod report;
pub mod rollup;

pub use engine::{player_kpis, AnalyticsEngine, PlayerSelection, Tables, TeamSelection};
pub use error::AnalyticsError;
pub use metric::{percentage, Metric, Section};
pub use report::{PlayerReport, PlayerSummary, TeamReport};
