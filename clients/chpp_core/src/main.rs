use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use chpp_core::{
    config::ChppConfig,
    ht_datetime::parse_timezone,
    league::{League, LeagueRef},
    lineup::load_match_lineup,
    utils::{format_formation, parse_date_arg, parse_ht_date},
    HtDatetime,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// League id or name (defaults to HATTRICK_LEAGUE)
    #[arg(short, long, global = true)]
    league: Option<String>,

    /// IANA timezone (defaults to HATTRICK_TIMEZONE or CET)
    #[arg(short, long, global = true)]
    timezone: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a real date to the Hattrick calendar
    Convert {
        /// Date such as 2020-09-07 or "2020-09-07 18:30:00"
        date: String,
    },
    /// Convert a Hattrick date (season.week.weekday) to a real date
    ToDate {
        /// Date such as 75.15.1
        date: String,
    },
    /// Show the current Hattrick date
    Now,
    /// Replay a match lineup file and list its formations
    Formations {
        /// Path to the lineup JSON file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct DateOutput {
    date: String,
    timezone: &'static str,
    league: &'static str,
    season: i32,
    week: u32,
    weekday: u32,
}

impl From<&HtDatetime> for DateOutput {
    fn from(value: &HtDatetime) -> Self {
        Self {
            date: value
                .datetime()
                .format(chpp_core::ht_datetime::CHPP_DATETIME_FORMAT)
                .to_string(),
            timezone: value.timezone_name(),
            league: value.league().name,
            season: value.season(),
            week: value.week(),
            weekday: value.weekday(),
        }
    }
}

fn print_date(value: &HtDatetime, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&DateOutput::from(value))?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ChppConfig::from_env();

    let league: League = match &cli.league {
        Some(league) => League::from(league.parse::<LeagueRef>()?),
        None => config.calendar.league(),
    };
    let timezone = match &cli.timezone {
        Some(name) => parse_timezone(name)?,
        None => config.calendar.timezone()?,
    };
    let json = cli.json || config.output.json;
    info!("Using league {} and timezone {}", league, timezone.name());

    match cli.command {
        Commands::Convert { date } => {
            let naive = parse_date_arg(&date)?;
            let value = HtDatetime::from_naive(naive, league, Some(timezone))?;
            print_date(&value, json)?;
        }
        Commands::ToDate { date } => {
            let (season, week, weekday) = parse_ht_date(&date)?;
            let value = HtDatetime::from_ht_calendar(season, week, weekday, league, Some(timezone))?;
            print_date(&value, json)?;
        }
        Commands::Now => {
            print_date(&HtDatetime::now(league, Some(timezone)), json)?;
        }
        Commands::Formations { file } => {
            let lineup = load_match_lineup(&file)
                .with_context(|| format!("Failed to load lineup from {:?}", file))?;
            let changes = lineup.formations()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&changes)?);
            } else {
                for change in changes {
                    println!("{:>3}' {}", change.minute, format_formation(&change.formation));
                }
            }
        }
    }

    Ok(())
}
