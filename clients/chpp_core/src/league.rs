//! Hattrick leagues and their season offsets.
//!
//! Hattrick numbers seasons globally from the launch of the Swedish league in
//! 1997. Every league launched later counts its own seasons from its launch,
//! so its local season number is the global one plus a (negative) offset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct League {
    pub id: u32,
    pub name: &'static str,
    pub season_offset: i32,
}

const fn league(id: u32, name: &'static str, season_offset: i32) -> League {
    League {
        id,
        name,
        season_offset,
    }
}

/// Leagues with a confirmed season offset, sorted by id. Any other league
/// resolves to [`League::DEFAULT`] and counts seasons globally.
pub const LEAGUES: &[League] = &[league(1, "Sweden", 0), league(16, "Brazil", -12)];

impl League {
    /// The league used when none is given or the given one is not known.
    pub const DEFAULT: League = league(0, "", 0);

    pub fn from_id(id: u32) -> League {
        LEAGUES
            .binary_search_by_key(&id, |l| l.id)
            .map(|idx| LEAGUES[idx])
            .unwrap_or(League::DEFAULT)
    }

    /// Case-sensitive lookup by name.
    pub fn from_name(name: &str) -> League {
        LEAGUES
            .iter()
            .find(|l| l.name == name)
            .copied()
            .unwrap_or(League::DEFAULT)
    }

    pub fn is_default(&self) -> bool {
        self.id == League::DEFAULT.id
    }
}

impl Default for League {
    fn default() -> Self {
        League::DEFAULT
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "<no league>")
        } else {
            write!(f, "{} ({})", self.name, self.id)
        }
    }
}

impl From<u32> for League {
    fn from(id: u32) -> Self {
        League::from_id(id)
    }
}

impl From<&str> for League {
    fn from(name: &str) -> Self {
        League::from_name(name)
    }
}

impl<T: Into<League>> From<Option<T>> for League {
    fn from(league: Option<T>) -> Self {
        league.map(Into::into).unwrap_or_default()
    }
}

impl From<&LeagueRef> for League {
    fn from(league: &LeagueRef) -> Self {
        match league {
            LeagueRef::None => League::DEFAULT,
            LeagueRef::Id(id) => League::from_id(*id),
            LeagueRef::Name(name) => League::from_name(name),
        }
    }
}

impl From<LeagueRef> for League {
    fn from(league: LeagueRef) -> Self {
        League::from(&league)
    }
}

/// A league as a caller names it: by id, by name, or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeagueRef {
    #[default]
    None,
    Id(u32),
    Name(String),
}

impl FromStr for LeagueRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(LeagueRef::None);
        }
        Ok(match s.parse::<u32>() {
            Ok(id) => LeagueRef::Id(id),
            Err(_) => LeagueRef::Name(s.to_string()),
        })
    }
}

/// Name of the league with the given id, or an empty string when unknown.
pub fn league_name(id: u32) -> &'static str {
    League::from_id(id).name
}

pub fn league_offset(league: impl Into<League>) -> i32 {
    league.into().season_offset
}
