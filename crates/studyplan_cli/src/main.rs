//! Study plan command-line entry point.
//!
//! # Responsibility
//! - Run generate/redistribute against a curriculum file or the plan store.
//! - Print plans per day with calendar dates.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use studyplan_core::db::open_db;
use studyplan_core::{
    date_for_day, default_log_level, distribute, group_by_day, init_logging, PlanService,
    PlanSettings, SqlitePlanRepository, StudyItem,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "studyplan",
    version,
    about = "Spread a study curriculum evenly over a number of days",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Distribute a curriculum file over a number of days
    Generate {
        /// JSON array of `{subject, topic}` entries
        #[arg(short, long)]
        input: PathBuf,

        /// Number of plan days
        #[arg(short, long)]
        days: i64,

        /// Date of day 0 (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Save the plan to this database instead of only printing it
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Rebalance a stored plan over its stored day count
    Redistribute {
        /// Plan database path
        #[arg(long)]
        db: PathBuf,
    },

    /// Print a stored plan per day
    Show {
        /// Plan database path
        #[arg(long)]
        db: PathBuf,
    },
}

/// One curriculum entry in an input file.
#[derive(Deserialize)]
struct CurriculumEntry {
    #[serde(default)]
    id: Option<Uuid>,
    subject: String,
    topic: String,
    #[serde(default)]
    is_completed: bool,
    #[serde(default)]
    color: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
        let log_dir = log_dir.to_str().context("log dir must be valid UTF-8")?;
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }

    match cli.command {
        Commands::Generate {
            input,
            days,
            start,
            db,
        } => {
            let items = read_curriculum(&input)?;
            let start = start.unwrap_or_else(|| Local::now().date_naive());
            match db {
                Some(db) => {
                    let total_days = u32::try_from(days)
                        .ok()
                        .filter(|days| *days > 0)
                        .with_context(|| format!("--days must be positive, got {days}"))?;
                    let settings = PlanSettings::new(total_days, start);
                    let conn = open_db(&db)
                        .with_context(|| format!("failed to open {}", db.display()))?;
                    let service = PlanService::new(SqlitePlanRepository::new(&conn));
                    let plan = service.generate(items, settings)?;
                    print_plan(&plan, settings);
                }
                None => {
                    let plan = distribute(items, days)?;
                    let total_days = u32::try_from(days)?;
                    print_plan(&plan, PlanSettings::new(total_days, start));
                }
            }
        }
        Commands::Redistribute { db } => {
            let conn =
                open_db(&db).with_context(|| format!("failed to open {}", db.display()))?;
            let service = PlanService::new(SqlitePlanRepository::new(&conn));
            let plan = service.redistribute()?;
            print_plan(&plan, service.settings()?);
        }
        Commands::Show { db } => {
            let conn =
                open_db(&db).with_context(|| format!("failed to open {}", db.display()))?;
            let service = PlanService::new(SqlitePlanRepository::new(&conn));
            print_plan(&service.items()?, service.settings()?);
        }
    }

    Ok(())
}

fn read_curriculum(path: &Path) -> Result<Vec<StudyItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let entries: Vec<CurriculumEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON curriculum array", path.display()))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let mut item = match entry.id {
                Some(id) => StudyItem::with_id(id, entry.subject, entry.topic)?,
                None => StudyItem::new(entry.subject, entry.topic),
            };
            if let Err(err) = item.validate() {
                bail!("entry {index}: {err}");
            }
            item.is_completed = entry.is_completed;
            item.color = entry.color;
            Ok(item)
        })
        .collect()
}

fn print_plan(items: &[StudyItem], settings: PlanSettings) {
    for (day, bucket) in group_by_day(items, settings.total_days) {
        let date = date_for_day(settings.start_date, day)
            .map(|date| date.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "Day {:>3}  {}  ({} item(s))",
            u64::from(day) + 1,
            date,
            bucket.len()
        );
        for item in bucket {
            let mark = if item.is_completed { "x" } else { " " };
            println!("  [{mark}] {:<12} {}", item.subject, item.topic);
        }
    }

    let unassigned = items.iter().filter(|item| !item.is_assigned()).count();
    if unassigned > 0 {
        println!("{unassigned} item(s) without a day");
    }
}
