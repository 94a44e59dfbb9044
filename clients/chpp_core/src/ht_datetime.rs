//! Conversion between real dates and the Hattrick calendar.
//!
//! The Hattrick calendar starts on Monday 1997-09-22 00:00 (CET). A season
//! lasts 16 weeks, and a date inside a season is written as
//! `(season, week, weekday)` with weekday 1 being Monday. Season numbers are
//! league specific, see [`crate::league`].
//!
//! [`HtDatetime`] keeps both projections of one instant side by side. Every
//! `with_*` method builds a whole new value, so the real and the Hattrick
//! projections can never disagree.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};
use tracing::debug;

use crate::error::CalendarError;
use crate::league::League;

pub const DEFAULT_TIMEZONE: Tz = Tz::CET;

/// Text form of dates in CHPP documents and request parameters.
pub const CHPP_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const WEEKS_PER_SEASON: i64 = 16;
const DAYS_PER_WEEK: i64 = 7;
// Well inside what chrono can represent
const MAX_DAY_SPAN: i64 = 50_000_000;

fn origin_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1997, 9, 22).expect("Hattrick epoch is a valid date")
}

/// 1997-09-22 00:00:00 as a wall-clock value.
pub fn origin() -> NaiveDateTime {
    origin_date().and_time(NaiveTime::MIN)
}

/// Look up an IANA timezone by name, e.g. `"CET"` or `"America/Belize"`.
pub fn parse_timezone(name: &str) -> Result<Tz, CalendarError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| CalendarError::UnknownTimezone(name.to_string()))
}

// The epoch is checked on the wall clock only, whatever zone the value is in.
fn check_epoch(naive: NaiveDateTime) -> Result<(), CalendarError> {
    if naive < origin() {
        return Err(CalendarError::BeforeEpoch(naive));
    }
    Ok(())
}

fn check_time(hour: u32, minute: u32, second: u32) -> Result<NaiveTime, CalendarError> {
    let mut fields = Vec::new();
    if hour > 23 {
        fields.push("hour");
    }
    if minute > 59 {
        fields.push("minute");
    }
    if second > 59 {
        fields.push("second");
    }
    match NaiveTime::from_hms_opt(hour, minute, second) {
        Some(time) if fields.is_empty() => Ok(time),
        _ => Err(CalendarError::invalid(
            &fields,
            format!("{hour:02}:{minute:02}:{second:02} is not a valid time of day"),
        )),
    }
}

fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Skipped by a DST jump: read the wall clock with the offset in force before it
            let offset = tz
                .offset_from_utc_datetime(&(naive - Duration::days(1)))
                .fix()
                .local_minus_utc();
            tz.from_utc_datetime(&(naive - Duration::seconds(offset as i64)))
        }
    }
}

/// A point in time seen both on the real calendar and on the Hattrick
/// calendar of one league.
#[derive(Debug, Clone, Copy)]
pub struct HtDatetime {
    datetime: DateTime<Tz>,
    league: League,
    season: i32,
    week: u32,
    weekday: u32,
}

impl HtDatetime {
    /// Midnight of a Hattrick date.
    pub fn from_ht_calendar(
        season: i32,
        week: i32,
        weekday: i32,
        league: impl Into<League>,
        timezone: Option<Tz>,
    ) -> Result<Self, CalendarError> {
        Self::from_ht_calendar_hms(season, week, weekday, 0, 0, 0, league, timezone)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_ht_calendar_hms(
        season: i32,
        week: i32,
        weekday: i32,
        hour: u32,
        minute: u32,
        second: u32,
        league: impl Into<League>,
        timezone: Option<Tz>,
    ) -> Result<Self, CalendarError> {
        let mut fields = Vec::new();
        if season < 1 {
            fields.push("season");
        }
        if !(1..=WEEKS_PER_SEASON as i32).contains(&week) {
            fields.push("week");
        }
        if !(1..=DAYS_PER_WEEK as i32).contains(&weekday) {
            fields.push("weekday");
        }
        if !fields.is_empty() {
            return Err(CalendarError::invalid(
                &fields,
                format!(
                    "got season={season}, week={week}, weekday={weekday}; expected season >= 1, week in 1..=16, weekday in 1..=7"
                ),
            ));
        }
        let time = check_time(hour, minute, second)?;
        let league = league.into();

        let global_season = season as i64 - league.season_offset as i64;
        let delta_weeks = (global_season - 1) * WEEKS_PER_SEASON + (week as i64 - 1);
        let delta_days = weekday as i64 - 1;
        let date = Some(delta_weeks * DAYS_PER_WEEK + delta_days)
            .filter(|days| days.abs() < MAX_DAY_SPAN)
            .and_then(|days| origin_date().checked_add_signed(Duration::days(days)))
            .ok_or_else(|| {
                CalendarError::invalid(&["season"], format!("season {season} is out of range"))
            })?;
        let naive = date.and_time(time);
        check_epoch(naive)?;

        Ok(Self::project(
            localize(timezone.unwrap_or(DEFAULT_TIMEZONE), naive),
            league,
        ))
    }

    /// Midnight of a real calendar date.
    pub fn from_calendar(
        year: i32,
        month: i32,
        day: i32,
        league: impl Into<League>,
        timezone: Option<Tz>,
    ) -> Result<Self, CalendarError> {
        Self::from_calendar_hms(year, month, day, 0, 0, 0, league, timezone)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_calendar_hms(
        year: i32,
        month: i32,
        day: i32,
        hour: u32,
        minute: u32,
        second: u32,
        league: impl Into<League>,
        timezone: Option<Tz>,
    ) -> Result<Self, CalendarError> {
        let mut fields = Vec::new();
        if year < 1997 {
            fields.push("year");
        }
        if !(1..=12).contains(&month) {
            fields.push("month");
        }
        if !(1..=31).contains(&day) {
            fields.push("day");
        }
        if !fields.is_empty() {
            return Err(CalendarError::invalid(
                &fields,
                format!(
                    "got year={year}, month={month}, day={day}; expected year >= 1997, month in 1..=12, day in 1..=31"
                ),
            ));
        }
        let date = NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or_else(|| {
            CalendarError::invalid(
                &["day"],
                format!("{year:04}-{month:02} has no day {day}"),
            )
        })?;
        let naive = date.and_time(check_time(hour, minute, second)?);
        Self::from_naive(naive, league, timezone)
    }

    /// Build from an aware instant. The instant keeps its own zone unless
    /// `timezone` overrides it.
    pub fn from_instant(
        instant: DateTime<Tz>,
        league: impl Into<League>,
        timezone: Option<Tz>,
    ) -> Result<Self, CalendarError> {
        check_epoch(instant.naive_local())?;
        let tz = timezone.unwrap_or_else(|| instant.timezone());
        Ok(Self::project(instant.with_timezone(&tz), league.into()))
    }

    /// Build from a wall-clock value read in `timezone` (CET if not given).
    pub fn from_naive(
        naive: NaiveDateTime,
        league: impl Into<League>,
        timezone: Option<Tz>,
    ) -> Result<Self, CalendarError> {
        check_epoch(naive)?;
        Ok(Self::project(
            localize(timezone.unwrap_or(DEFAULT_TIMEZONE), naive),
            league.into(),
        ))
    }

    pub fn now(league: impl Into<League>, timezone: Option<Tz>) -> Self {
        let tz = timezone.unwrap_or(DEFAULT_TIMEZONE);
        Self::project(Utc::now().with_timezone(&tz), league.into())
    }

    /// Parse a CHPP date. CHPP always writes dates on the CET wall clock; the
    /// result is then moved into `timezone` if one is given.
    pub fn parse_chpp(
        text: &str,
        league: impl Into<League>,
        timezone: Option<Tz>,
    ) -> Result<Self, CalendarError> {
        let naive = NaiveDateTime::parse_from_str(text.trim(), CHPP_DATETIME_FORMAT).map_err(
            |e| CalendarError::Parse {
                input: text.to_string(),
                reason: e.to_string(),
            },
        )?;
        let parsed = Self::from_naive(naive, league, Some(DEFAULT_TIMEZONE))?;
        Ok(match timezone {
            Some(tz) => parsed.with_timezone(tz),
            None => parsed,
        })
    }

    /// Render in the CHPP request format, always on the CET wall clock.
    pub fn to_chpp_string(&self) -> String {
        self.datetime
            .with_timezone(&DEFAULT_TIMEZONE)
            .format(CHPP_DATETIME_FORMAT)
            .to_string()
    }

    // The single place the Hattrick projection is derived from an instant
    fn project(datetime: DateTime<Tz>, league: League) -> Self {
        let days = (datetime.date_naive() - origin_date()).num_days();
        let weeks = days.div_euclid(DAYS_PER_WEEK);
        let global_season = weeks.div_euclid(WEEKS_PER_SEASON) + 1;
        let week = weeks.rem_euclid(WEEKS_PER_SEASON) + 1;
        let value = Self {
            datetime,
            league,
            season: global_season as i32 + league.season_offset,
            week: week as u32,
            weekday: datetime.weekday().number_from_monday(),
        };
        debug!(
            "Projected {} onto season {} week {} weekday {} ({})",
            datetime, value.season, value.week, value.weekday, league
        );
        value
    }

    pub fn season(&self) -> i32 {
        self.season
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn weekday(&self) -> u32 {
        self.weekday
    }

    pub fn year(&self) -> i32 {
        self.datetime.year()
    }

    pub fn month(&self) -> u32 {
        self.datetime.month()
    }

    pub fn day(&self) -> u32 {
        self.datetime.day()
    }

    pub fn hour(&self) -> u32 {
        self.datetime.hour()
    }

    pub fn minute(&self) -> u32 {
        self.datetime.minute()
    }

    pub fn second(&self) -> u32 {
        self.datetime.second()
    }

    pub fn timezone(&self) -> Tz {
        self.datetime.timezone()
    }

    pub fn timezone_name(&self) -> &'static str {
        self.datetime.timezone().name()
    }

    pub fn league(&self) -> League {
        self.league
    }

    pub fn datetime(&self) -> DateTime<Tz> {
        self.datetime
    }

    fn rebuild_ht(&self, season: i32, week: i32, weekday: i32) -> Result<Self, CalendarError> {
        Self::from_ht_calendar_hms(
            season,
            week,
            weekday,
            self.hour(),
            self.minute(),
            self.second(),
            self.league,
            Some(self.timezone()),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn rebuild_calendar(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, CalendarError> {
        Self::from_calendar_hms(
            year,
            month,
            day,
            hour,
            minute,
            second,
            self.league,
            Some(self.timezone()),
        )
    }

    pub fn with_season(&self, season: i32) -> Result<Self, CalendarError> {
        self.rebuild_ht(season, self.week as i32, self.weekday as i32)
    }

    pub fn with_week(&self, week: i32) -> Result<Self, CalendarError> {
        self.rebuild_ht(self.season, week, self.weekday as i32)
    }

    pub fn with_weekday(&self, weekday: i32) -> Result<Self, CalendarError> {
        self.rebuild_ht(self.season, self.week as i32, weekday)
    }

    pub fn with_year(&self, year: i32) -> Result<Self, CalendarError> {
        self.rebuild_calendar(
            year,
            self.month() as i32,
            self.day() as i32,
            self.hour(),
            self.minute(),
            self.second(),
        )
    }

    pub fn with_month(&self, month: i32) -> Result<Self, CalendarError> {
        self.rebuild_calendar(
            self.year(),
            month,
            self.day() as i32,
            self.hour(),
            self.minute(),
            self.second(),
        )
    }

    pub fn with_day(&self, day: i32) -> Result<Self, CalendarError> {
        self.rebuild_calendar(
            self.year(),
            self.month() as i32,
            day,
            self.hour(),
            self.minute(),
            self.second(),
        )
    }

    pub fn with_hour(&self, hour: u32) -> Result<Self, CalendarError> {
        self.rebuild_calendar(
            self.year(),
            self.month() as i32,
            self.day() as i32,
            hour,
            self.minute(),
            self.second(),
        )
    }

    pub fn with_minute(&self, minute: u32) -> Result<Self, CalendarError> {
        self.rebuild_calendar(
            self.year(),
            self.month() as i32,
            self.day() as i32,
            self.hour(),
            minute,
            self.second(),
        )
    }

    pub fn with_second(&self, second: u32) -> Result<Self, CalendarError> {
        self.rebuild_calendar(
            self.year(),
            self.month() as i32,
            self.day() as i32,
            self.hour(),
            self.minute(),
            second,
        )
    }

    /// Same instant seen from another timezone.
    pub fn with_timezone(&self, timezone: Tz) -> Self {
        Self::project(self.datetime.with_timezone(&timezone), self.league)
    }

    /// Same instant counted in another league's seasons.
    pub fn with_league(&self, league: impl Into<League>) -> Self {
        let league = league.into();
        Self {
            league,
            season: self.season - self.league.season_offset + league.season_offset,
            ..*self
        }
    }

    /// Shift by a real-time delta. League and timezone are kept and the
    /// seconds of the result are dropped.
    pub fn checked_add(&self, delta: Duration) -> Result<Self, CalendarError> {
        let shifted = self.datetime.checked_add_signed(delta).ok_or_else(|| {
            CalendarError::invalid(&["datetime"], format!("{} + {} overflows", self, delta))
        })?;
        let truncated = shifted
            - Duration::seconds(shifted.second() as i64)
            - Duration::nanoseconds(shifted.nanosecond() as i64);
        Self::from_instant(truncated, self.league, None)
    }

    pub fn checked_sub(&self, delta: Duration) -> Result<Self, CalendarError> {
        self.checked_add(-delta)
    }
}

impl Add<Duration> for HtDatetime {
    type Output = Result<HtDatetime, CalendarError>;

    fn add(self, delta: Duration) -> Self::Output {
        self.checked_add(delta)
    }
}

impl Sub<Duration> for HtDatetime {
    type Output = Result<HtDatetime, CalendarError>;

    fn sub(self, delta: Duration) -> Self::Output {
        self.checked_sub(delta)
    }
}

impl Sub<HtDatetime> for HtDatetime {
    type Output = Duration;

    fn sub(self, other: HtDatetime) -> Duration {
        self.datetime.signed_duration_since(other.datetime)
    }
}

impl PartialEq for HtDatetime {
    fn eq(&self, other: &Self) -> bool {
        self.datetime == other.datetime
    }
}

impl Eq for HtDatetime {}

impl Hash for HtDatetime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.datetime.timestamp().hash(state);
        self.datetime.timestamp_subsec_nanos().hash(state);
    }
}

impl PartialOrd for HtDatetime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HtDatetime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.datetime
            .with_timezone(&Utc)
            .cmp(&other.datetime.with_timezone(&Utc))
    }
}

impl<Z: TimeZone> PartialEq<DateTime<Z>> for HtDatetime {
    fn eq(&self, other: &DateTime<Z>) -> bool {
        self.datetime.with_timezone(&Utc) == other.with_timezone(&Utc)
    }
}

impl<Z: TimeZone> PartialOrd<DateTime<Z>> for HtDatetime {
    fn partial_cmp(&self, other: &DateTime<Z>) -> Option<Ordering> {
        Some(
            self.datetime
                .with_timezone(&Utc)
                .cmp(&other.with_timezone(&Utc)),
        )
    }
}

impl fmt::Display for HtDatetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (season {}, week {}, weekday {})",
            self.datetime.format(CHPP_DATETIME_FORMAT),
            self.timezone_name(),
            self.season,
            self.week,
            self.weekday
        )
    }
}

impl Serialize for HtDatetime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_chpp_string())
    }
}

impl<'de> Deserialize<'de> for HtDatetime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        HtDatetime::parse_chpp(&text, League::DEFAULT, None).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Belize;
    use pretty_assertions::assert_eq;

    fn ht(value: &HtDatetime) -> (i32, u32, u32) {
        (value.season(), value.week(), value.weekday())
    }

    #[test]
    fn test_calendar_to_ht() {
        let date = HtDatetime::from_calendar(2020, 9, 7, None::<u32>, None).unwrap();
        assert_eq!(ht(&date), (75, 15, 1));

        let brazil = HtDatetime::from_calendar(2020, 9, 7, "Brazil", None).unwrap();
        assert_eq!(ht(&brazil), (63, 15, 1));
        assert_eq!(brazil.league().id, 16);
    }

    #[test]
    fn test_add_days_then_change_timezone() {
        let date = HtDatetime::from_calendar(2020, 9, 7, "Brazil", None).unwrap();
        let later = (date + Duration::days(900)).unwrap().with_timezone(Belize);
        assert_eq!(ht(&later), (71, 15, 4));
        assert_eq!(later.timezone_name(), "America/Belize");
        assert_eq!(later.league().name, "Brazil");
    }

    #[test]
    fn test_epoch_boundary() {
        let epoch = HtDatetime::from_naive(origin(), None::<u32>, None).unwrap();
        assert_eq!(ht(&epoch), (1, 1, 1));
        assert_eq!(epoch.timezone_name(), "CET");

        let before = origin() - Duration::seconds(1);
        assert_eq!(
            HtDatetime::from_naive(before, None::<u32>, None),
            Err(CalendarError::BeforeEpoch(before))
        );
    }

    #[test]
    fn test_epoch_check_ignores_zone() {
        // 00:00 in Belize is well after 00:00 CET, but only the wall clock is compared
        let instant = Belize.from_local_datetime(&origin()).unwrap();
        let date = HtDatetime::from_instant(instant, None::<u32>, None).unwrap();
        assert_eq!(date.timezone_name(), "America/Belize");
        assert_eq!(ht(&date), (1, 1, 1));

        let early = Belize
            .from_local_datetime(&(origin() - Duration::minutes(1)))
            .unwrap();
        assert!(HtDatetime::from_instant(early, None::<u32>, None).is_err());
    }

    #[test]
    fn test_invalid_ht_fields_are_named() {
        let err = HtDatetime::from_ht_calendar(0, 17, 3, None::<u32>, None).unwrap_err();
        match err {
            CalendarError::InvalidField { fields, .. } => {
                assert_eq!(fields, vec!["season", "week"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(HtDatetime::from_ht_calendar(1, 1, 8, None::<u32>, None).is_err());
        assert!(HtDatetime::from_ht_calendar(1, 0, 1, None::<u32>, None).is_err());
        assert!(HtDatetime::from_ht_calendar(i32::MAX, 1, 1, None::<u32>, None).is_err());
    }

    #[test]
    fn test_invalid_calendar_fields() {
        let err = HtDatetime::from_calendar(1996, 13, 1, None::<u32>, None).unwrap_err();
        match err {
            CalendarError::InvalidField { fields, .. } => {
                assert_eq!(fields, vec!["year", "month"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let err = HtDatetime::from_calendar(2021, 2, 30, None::<u32>, None).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidField { ref fields, .. } if fields == &vec!["day"]));

        // Passes the year check but lands before the epoch
        assert!(matches!(
            HtDatetime::from_calendar(1997, 1, 1, None::<u32>, None),
            Err(CalendarError::BeforeEpoch(_))
        ));
        assert!(HtDatetime::from_calendar_hms(2020, 1, 1, 24, 0, 0, None::<u32>, None).is_err());
    }

    #[test]
    fn test_first_season_of_each_league() {
        // Brazil's season 1 is global season 13
        let brazil = HtDatetime::from_ht_calendar(1, 1, 1, "Brazil", None).unwrap();
        assert_eq!(brazil.with_league("Sweden").season(), 13);
        let sweden = HtDatetime::from_ht_calendar(1, 1, 1, "Sweden", None).unwrap();
        assert_eq!(sweden.datetime().naive_local(), origin());
    }

    #[test]
    fn test_huge_season_with_league_offset_fails() {
        for league in ["Brazil", "Sweden"] {
            let err = HtDatetime::from_ht_calendar(i32::MAX, 1, 1, league, None).unwrap_err();
            assert!(
                matches!(err, CalendarError::InvalidField { ref fields, .. } if fields == &vec!["season"]),
                "{league}: {err:?}"
            );
        }
        let date = HtDatetime::from_calendar(2020, 9, 7, "Brazil", None).unwrap();
        assert!(date.with_season(i32::MAX).is_err());
    }

    #[test]
    fn test_ht_to_calendar() {
        let date = HtDatetime::from_ht_calendar(75, 15, 1, None::<u32>, None).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2020, 9, 7));

        let brazil = HtDatetime::from_ht_calendar(63, 15, 1, 16u32, None).unwrap();
        assert_eq!(brazil, date);
    }

    #[test]
    fn test_setters_rebuild_whole_value() {
        let date = HtDatetime::from_calendar_hms(2020, 9, 7, 18, 30, 15, "Brazil", None).unwrap();

        let next_season = date.with_season(64).unwrap();
        let expected = HtDatetime::from_ht_calendar_hms(
            64,
            date.week() as i32,
            date.weekday() as i32,
            date.hour(),
            date.minute(),
            date.second(),
            date.league(),
            Some(date.timezone()),
        )
        .unwrap();
        assert_eq!(next_season, expected);
        assert_eq!(ht(&next_season), (64, 15, 1));
        assert_eq!((next_season.hour(), next_season.minute()), (18, 30));

        let friday = date.with_weekday(5).unwrap();
        assert_eq!((friday.year(), friday.month(), friday.day()), (2020, 9, 11));

        let new_year = date.with_year(2021).unwrap();
        assert_eq!((new_year.month(), new_year.day()), (9, 7));
        assert_eq!(new_year.weekday(), 2);

        assert!(date.with_week(17).is_err());
        assert!(date.with_month(0).is_err());
        assert!(date.with_minute(60).is_err());
    }

    #[test]
    fn test_league_setter_keeps_instant() {
        let date = HtDatetime::from_calendar(2020, 9, 7, None::<u32>, None).unwrap();
        let brazil = date.with_league("Brazil");
        assert_eq!(brazil.datetime(), date.datetime());
        assert_eq!(brazil.season(), 63);
        assert_eq!(brazil.with_league(League::DEFAULT).season(), 75);
    }

    #[test]
    fn test_add_truncates_seconds() {
        let date = HtDatetime::from_calendar_hms(2020, 9, 7, 10, 15, 42, None::<u32>, None).unwrap();
        let later = (date + Duration::minutes(50)).unwrap();
        assert_eq!((later.hour(), later.minute(), later.second()), (11, 5, 0));

        let earlier = (date - Duration::days(7)).unwrap();
        assert_eq!(earlier.week(), 14);
        assert_eq!(date - earlier, Duration::days(7) + Duration::seconds(42));

        let epoch = HtDatetime::from_naive(origin(), None::<u32>, None).unwrap();
        assert!((epoch - Duration::days(1)).is_err());
    }

    #[test]
    fn test_comparisons() {
        let a = HtDatetime::from_calendar(2020, 9, 7, None::<u32>, None).unwrap();
        let b = HtDatetime::from_calendar(2020, 9, 8, "Brazil", None).unwrap();
        assert!(a < b);
        assert!(b >= a);
        assert_ne!(a, b);

        // Same instant, different zone and league
        let c = a.with_timezone(Belize).with_league("Brazil");
        assert_eq!(a, c);

        let utc = Utc.with_ymd_and_hms(2020, 9, 6, 22, 0, 0).unwrap();
        assert!(a == utc);
        assert!(b > utc);
    }

    #[test]
    fn test_chpp_text_round_trip() {
        let date = HtDatetime::parse_chpp("2020-09-07 20:00:00", None::<u32>, Some(Belize)).unwrap();
        assert_eq!(date.timezone_name(), "America/Belize");
        assert_eq!(date.hour(), 12);
        assert_eq!(date.to_chpp_string(), "2020-09-07 20:00:00");

        assert!(matches!(
            HtDatetime::parse_chpp("07/09/2020", None::<u32>, None),
            Err(CalendarError::Parse { .. })
        ));
    }

    #[test]
    fn test_serde_uses_chpp_text() {
        let date = HtDatetime::from_calendar_hms(2021, 3, 1, 9, 5, 0, None::<u32>, None).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, r#""2021-03-01 09:05:00""#);
        let back: HtDatetime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn test_dst_gap_moves_forward() {
        // 02:30 does not exist in CET on 2021-03-28
        let date = HtDatetime::from_calendar_hms(2021, 3, 28, 2, 30, 0, None::<u32>, None).unwrap();
        assert_eq!((date.hour(), date.minute()), (3, 30));
        assert_eq!(date.weekday(), 7);
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("America/Belize").unwrap(), Belize);
        assert_eq!(
            parse_timezone("Mars/Olympus"),
            Err(CalendarError::UnknownTimezone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let date = HtDatetime::from_calendar(2020, 9, 7, None::<u32>, None).unwrap();
        assert_eq!(
            date.to_string(),
            "2020-09-07 00:00:00 CET (season 75, week 15, weekday 1)"
        );
    }
}
