use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::ht_datetime::CHPP_DATETIME_FORMAT;

/// Accepts `2020-09-07`, `2020-09-07 18:30` or the full CHPP form.
pub fn parse_date_arg(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    NaiveDateTime::parse_from_str(input, CHPP_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M"))
        .or_else(|_| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .with_context(|| format!("Invalid date: {}", input))
}

/// Parses a Hattrick date written as `season.week.weekday`, e.g. `75.15.1`.
pub fn parse_ht_date(input: &str) -> Result<(i32, i32, i32)> {
    let parts: Vec<&str> = input.trim().split('.').collect();
    if parts.len() != 3 {
        anyhow::bail!("Invalid Hattrick date format (expected season.week.weekday): {}", input);
    }

    let season = parts[0]
        .trim()
        .parse::<i32>()
        .with_context(|| format!("Invalid season: {}", parts[0]))?;
    let week = parts[1]
        .trim()
        .parse::<i32>()
        .with_context(|| format!("Invalid week: {}", parts[1]))?;
    let weekday = parts[2]
        .trim()
        .parse::<i32>()
        .with_context(|| format!("Invalid weekday: {}", parts[2]))?;

    Ok((season, week, weekday))
}

/// `"442"` -> `"4-4-2"`
pub fn format_formation(formation: &str) -> String {
    formation
        .chars()
        .map(|c| c.to_string())
        .collect::<Vec<String>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_arg() {
        let expected = NaiveDate::from_ymd_opt(2020, 9, 7).unwrap();
        assert_eq!(
            parse_date_arg("2020-09-07").unwrap(),
            expected.and_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date_arg("2020-09-07 18:30").unwrap(),
            expected.and_hms_opt(18, 30, 0).unwrap()
        );
        assert_eq!(
            parse_date_arg(" 2020-09-07 18:30:15 ").unwrap(),
            expected.and_hms_opt(18, 30, 15).unwrap()
        );
        assert!(parse_date_arg("07/09/2020").is_err());
    }

    #[test]
    fn test_parse_ht_date() {
        assert_eq!(parse_ht_date("75.15.1").unwrap(), (75, 15, 1));
        assert_eq!(parse_ht_date(" 63. 2 .7").unwrap(), (63, 2, 7));
        assert!(parse_ht_date("75.15").is_err());
        assert!(parse_ht_date("75.x.1").is_err());
    }

    #[test]
    fn test_format_formation() {
        assert_eq!(format_formation("442"), "4-4-2");
        assert_eq!(format_formation("523"), "5-2-3");
    }
}
