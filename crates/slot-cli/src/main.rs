//! `slots` CLI — resolve provider availability into bookable slots.
//!
//! ## Usage
//!
//! ```sh
//! # Dates offered over the next 14 days (schedule JSON on stdin)
//! cat schedule.json | slots dates
//!
//! # Pin "today" for reproducible output
//! slots dates -i schedule.json --now 2026-03-16
//!
//! # Times offered on one date, at 15-minute steps
//! slots --granularity 15 times -i schedule.json --date 2026-03-18
//!
//! # Open slots after removing existing bookings
//! slots slots -i schedule.json --bookings bookings.json --now 2026-03-16T09:00:00Z
//!
//! # Report malformed rules (exit status 1 with --strict)
//! slots validate -i schedule.json --strict
//!
//! # Export recurring rules as RFC 5545 RRULEs
//! slots --format text rrule -i schedule.json
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use slot_engine::recurrence::to_rrule;
use slot_engine::rule::{format_dates, format_time, format_times, parse_date};
use slot_engine::{
    parse_now, BookedSlot, Clock, ProviderSchedule, ResolverConfig, ScheduleReport, SlotResolver,
    SystemClock,
};
use std::io::{self, Read};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Resolve provider availability rules into bookable appointment slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Resolver config JSON file (flags and SLOTS_* variables override it)
    #[arg(long, global = true, env = "SLOTS_CONFIG")]
    config: Option<String>,

    /// Days ahead over which recurring rules expand
    #[arg(long, global = true, env = "SLOTS_HORIZON_DAYS")]
    horizon: Option<u32>,

    /// Slot step in minutes
    #[arg(long, global = true, env = "SLOTS_GRANULARITY_MINUTES")]
    granularity: Option<u32>,

    /// Appointment length in minutes (defaults to the slot step)
    #[arg(long, global = true, env = "SLOTS_SESSION_MINUTES")]
    session: Option<u32>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Args)]
struct Io {
    /// Schedule JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List offerable dates
    Dates {
        #[command(flatten)]
        io: Io,
        /// Pin "now" (RFC 3339, local YYYY-MM-DDTHH:MM, or YYYY-MM-DD)
        #[arg(long)]
        now: Option<String>,
    },
    /// List offerable start times on one date
    Times {
        #[command(flatten)]
        io: Io,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// List slots still open for booking
    Slots {
        #[command(flatten)]
        io: Io,
        /// Existing bookings JSON file
        #[arg(long)]
        bookings: Option<String>,
        /// Pin "now" (RFC 3339, local YYYY-MM-DDTHH:MM, or YYYY-MM-DD)
        #[arg(long)]
        now: Option<String>,
    },
    /// Report rules that were rejected or can never yield a slot
    Validate {
        #[command(flatten)]
        io: Io,
        /// Exit with status 1 when any warning is reported
        #[arg(long)]
        strict: bool,
    },
    /// Export recurring rules as RFC 5545 RRULEs
    Rrule {
        #[command(flatten)]
        io: Io,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationOutput<'a> {
    provider_id: &'a str,
    timezone: &'static str,
    rule_count: usize,
    warnings: &'a [slot_engine::RuleWarning],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RruleOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_id: Option<String>,
    rrule: String,
    start_time: String,
    end_time: String,
    active: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let format = cli.format;

    match cli.command {
        Commands::Dates { io, now } => {
            let report = read_schedule(io.input.as_deref(), config.granularity_minutes)?;
            let clock = clock_for(now.as_deref(), &report)?;
            let resolver = SlotResolver::with_clock(config, clock);
            let dates = format_dates(&resolver.offerable_dates(&report.schedule));
            write_output(io.output.as_deref(), &render_list(format, &dates)?)?;
        }
        Commands::Times { io, date } => {
            let date = parse_date(&date).with_context(|| format!("Invalid --date: {}", date))?;
            let report = read_schedule(io.input.as_deref(), config.granularity_minutes)?;
            let resolver = SlotResolver::new(config);
            let times = format_times(&resolver.offerable_times(&report.schedule, date));
            write_output(io.output.as_deref(), &render_list(format, &times)?)?;
        }
        Commands::Slots { io, bookings, now } => {
            let report = read_schedule(io.input.as_deref(), config.granularity_minutes)?;
            let bookings = match bookings.as_deref() {
                Some(path) => read_bookings(path)?,
                None => Vec::new(),
            };
            let clock = clock_for(now.as_deref(), &report)?;
            let resolver = SlotResolver::with_clock(config, clock);
            let slots = resolver.bookable_slots(&report.schedule, &bookings);
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&slots)?,
                OutputFormat::Text => lines(slots.iter().map(|s| s.to_string())),
            };
            write_output(io.output.as_deref(), &rendered)?;
        }
        Commands::Validate { io, strict } => {
            let report = read_schedule(io.input.as_deref(), config.granularity_minutes)?;
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&ValidationOutput {
                    provider_id: &report.schedule.provider_id,
                    timezone: report.schedule.timezone.name(),
                    rule_count: report.schedule.rules.len(),
                    warnings: &report.warnings,
                })?,
                OutputFormat::Text => {
                    let mut out = vec![format!(
                        "{} rules accepted, {} warnings",
                        report.schedule.rules.len(),
                        report.warnings.len()
                    )];
                    out.extend(report.warnings.iter().map(|w| match &w.rule_id {
                        Some(id) => format!("row {} ({}): {}", w.index, id, w.defect),
                        None => format!("row {}: {}", w.index, w.defect),
                    }));
                    lines(out)
                }
            };
            write_output(io.output.as_deref(), &rendered)?;
            if strict && !report.warnings.is_empty() {
                process::exit(1);
            }
        }
        Commands::Rrule { io } => {
            let report = read_schedule(io.input.as_deref(), config.granularity_minutes)?;
            let rules: Vec<RruleOutput> = report
                .schedule
                .rules
                .iter()
                .filter_map(|rule| {
                    to_rrule(rule).map(|rrule| RruleOutput {
                        rule_id: rule.id.clone(),
                        rrule,
                        start_time: format_time(rule.start),
                        end_time: format_time(rule.end),
                        active: rule.active,
                    })
                })
                .collect();
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&rules)?,
                OutputFormat::Text => lines(rules.iter().map(|r| {
                    format!(
                        "{} {} {}-{}{}",
                        r.rule_id.as_deref().unwrap_or("-"),
                        r.rrule,
                        r.start_time,
                        r.end_time,
                        if r.active { "" } else { " (inactive)" }
                    )
                })),
            };
            write_output(io.output.as_deref(), &rendered)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Config file first, then flag/environment overrides, then validation.
fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse config file: {}", path))?
        }
        None => ResolverConfig::default(),
    };

    if let Some(horizon) = cli.horizon {
        config.horizon_days = horizon;
    }
    if let Some(granularity) = cli.granularity {
        config.granularity_minutes = granularity;
    }
    if let Some(session) = cli.session {
        config.session_minutes = Some(session);
    }

    config.validate().context("Invalid resolver configuration")?;
    tracing::debug!(?config, "resolver configuration");
    Ok(config)
}

fn clock_for(now: Option<&str>, report: &ScheduleReport) -> Result<Box<dyn Clock>> {
    match now {
        Some(now) => {
            let clock = parse_now(now, report.schedule.timezone)
                .with_context(|| format!("Invalid --now: {}", now))?;
            Ok(Box::new(clock))
        }
        None => Ok(Box::new(SystemClock)),
    }
}

fn read_schedule(path: Option<&str>, granularity_minutes: u32) -> Result<ScheduleReport> {
    let json = read_input(path)?;
    let report = ProviderSchedule::from_json(&json, granularity_minutes)
        .context("Failed to parse schedule JSON")?;
    if !report.warnings.is_empty() {
        tracing::info!(
            warnings = report.warnings.len(),
            "some availability rules were skipped or flagged; run `slots validate` for details"
        );
    }
    Ok(report)
}

fn read_bookings(path: &str) -> Result<Vec<BookedSlot>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read bookings file: {}", path))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse bookings file: {}", path))
}

fn render_list(format: OutputFormat, items: &[String]) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(items)?,
        OutputFormat::Text => lines(items.iter().cloned()),
    })
}

fn lines(items: impl IntoIterator<Item = String>) -> String {
    items.into_iter().collect::<Vec<_>>().join("\n")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            if !content.is_empty() {
                println!("{}", content);
            }
        }
    }
    Ok(())
}
