//! Core of a Hattrick CHPP client: the Hattrick calendar and match lineup
//! replay.

pub mod config;
pub mod error;
pub mod ht_datetime;
pub mod league;
pub mod lineup;
pub mod types;
pub mod utils;

pub use error::{CalendarError, LineupError};
pub use ht_datetime::HtDatetime;
pub use league::{League, LeagueRef};
pub use lineup::{compute_formation_changes, LineupPosition, LineupSnapshot, MatchLineup};
pub use types::{FormationChange, MatchEvent, OrderType, RedCardEvent, SubstitutionEvent};
