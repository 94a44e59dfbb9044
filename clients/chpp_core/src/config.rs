use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use crate::error::CalendarError;
use crate::ht_datetime::parse_timezone;
use crate::league::{League, LeagueRef};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarConfig {
    pub timezone: String,
    pub league: LeagueRef,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: "CET".to_string(),
            league: LeagueRef::None,
        }
    }
}

impl CalendarConfig {
    pub fn timezone(&self) -> Result<Tz, CalendarError> {
        parse_timezone(&self.timezone)
    }

    pub fn league(&self) -> League {
        League::from(&self.league)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    pub json: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChppConfig {
    pub calendar: CalendarConfig,
    pub output: OutputConfig,
}

impl ChppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(timezone) = lookup("HATTRICK_TIMEZONE") {
            match parse_timezone(&timezone) {
                Ok(_) => config.calendar.timezone = timezone.trim().to_string(),
                Err(e) => warn!("Ignoring HATTRICK_TIMEZONE: {}", e),
            }
        }
        if let Some(league) = lookup("HATTRICK_LEAGUE") {
            if let Ok(league) = league.parse::<LeagueRef>() {
                if League::from(&league).is_default() && league != LeagueRef::None {
                    warn!("HATTRICK_LEAGUE {:?} is not a known league, seasons use offset 0", league);
                }
                config.calendar.league = league;
            }
        }
        if let Some(json) = lookup("HATTRICK_OUTPUT_JSON") {
            config.output.json = matches!(json.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ChppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ChppConfig::default());
        assert_eq!(config.calendar.timezone().unwrap(), Tz::CET);
        assert!(config.calendar.league().is_default());
        assert!(!config.output.json);
    }

    #[test]
    fn test_env_overrides() {
        let config = ChppConfig::from_lookup(lookup(&[
            ("HATTRICK_TIMEZONE", "America/Belize"),
            ("HATTRICK_LEAGUE", "16"),
            ("HATTRICK_OUTPUT_JSON", "true"),
        ]));
        assert_eq!(config.calendar.timezone, "America/Belize");
        assert_eq!(config.calendar.league().name, "Brazil");
        assert!(config.output.json);
    }

    #[test]
    fn test_bad_timezone_is_ignored() {
        let config = ChppConfig::from_lookup(lookup(&[("HATTRICK_TIMEZONE", "Nowhere/Land")]));
        assert_eq!(config.calendar.timezone, "CET");
    }

    #[test]
    fn test_league_by_name() {
        let config = ChppConfig::from_lookup(lookup(&[("HATTRICK_LEAGUE", "Brazil")]));
        assert_eq!(config.calendar.league().season_offset, -12);
    }
}
