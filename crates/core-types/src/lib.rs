pub mod club;
pub mod enums;
pub mod error;
pub mod range;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use club::{Achievement, ACHIEVEMENTS, CLUB_HISTORY};
pub use enums::RiskLevel;
pub use error::CoreError;
pub use range::{parse_date, DateRange, DrillAllowList};
pub use structs::{
    CalendarEntry, PlayerRecord, RosterEntry, SessionRecord, WellnessRecord, DISTANCE_ZONES,
};
