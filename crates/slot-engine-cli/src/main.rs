//! `slotfind` CLI: find common free time across calendars and share it.
//!
//! ## Usage
//!
//! ```sh
//! # Search with a request file and a free/busy response, JSON out
//! slotfind search -i request.json --busy freebusy.json
//!
//! # Weekday business hours, 60-minute candidates, posted to Slack
//! slotfind search --start 2026-02-23T00:00:00+09:00 --end 2026-02-28T00:00:00+09:00 \
//!     --busy freebusy.json --weekdays 1,2,3,4,5 --window 09:00-18:00 \
//!     --duration 60 --format slack
//!
//! # Skip national holidays
//! slotfind search -i request.json --exclude-holidays --holidays data/holidays-jp-2026.toml
//!
//! # Re-render saved slots as a voting list
//! slotfind format -i slots.json --format voting
//!
//! # List the holidays a table holds for a date range
//! slotfind holidays --holidays data/holidays-jp-2026.toml --from 2026-02-01 --until 2026-02-28
//! ```
//!
//! Settings layer from lowest to highest: built-in defaults, `--config`
//! file, request file, command-line flags.

mod config;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use slot_engine::share::format_as_mailto;
use slot_engine::{
    find_offered_slots, merge_contiguous_slots, BusySlot, DateRange, FreeBusyResponse,
    HolidayCalendar, OfferedSlot, SearchOutcome, SearchRequest, ShareFormat, SlotShape, Timestamp,
    TimeWindow, WeekdaySet,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use config::{load_holiday_file, Config};

#[derive(Parser)]
#[command(
    name = "slotfind",
    version,
    about = "Find common free time across calendars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with default search, share and holiday settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log each pipeline stage to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute offered slots from busy intervals
    Search(SearchArgs),
    /// Render a JSON list of slots in a share format
    Format {
        /// Slots JSON: an array, or a search result with a `slots` field
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        share: ShareArgs,
    },
    /// List holidays in a date range
    Holidays {
        /// Holiday table file (defaults to the config's holiday settings)
        #[arg(long)]
        holidays: Option<PathBuf>,
        /// First date, inclusive
        #[arg(long)]
        from: NaiveDate,
        /// Last date, inclusive
        #[arg(long)]
        until: NaiveDate,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Request JSON file (reads from stdin if omitted and no range is given)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Free/busy response JSON, or a bare array of busy intervals; repeatable
    #[arg(long)]
    busy: Vec<String>,
    /// Range start, e.g. 2026-02-24T09:00:00+09:00
    #[arg(long)]
    start: Option<Timestamp>,
    /// Range end
    #[arg(long)]
    end: Option<Timestamp>,
    /// Allowed weekdays, 0=Sunday..6=Saturday, comma-separated
    #[arg(long, value_delimiter = ',')]
    weekdays: Option<Vec<u8>>,
    /// Daily window as HH:MM-HH:MM
    #[arg(long)]
    window: Option<String>,
    /// Fixed meeting length in minutes
    #[arg(long, conflicts_with = "min_duration")]
    duration: Option<u32>,
    /// Offer free spans of at least this many minutes instead of fixed slots
    #[arg(long)]
    min_duration: Option<u32>,
    /// Ignore busy intervals of 24 hours or more
    #[arg(long)]
    exclude_all_day: bool,
    /// Drop slots on holidays
    #[arg(long)]
    exclude_holidays: bool,
    /// Holiday table file
    #[arg(long)]
    holidays: Option<PathBuf>,
    /// Merge overlapping or touching slots in JSON output
    #[arg(long)]
    merge_contiguous: bool,
    #[command(flatten)]
    share: ShareArgs,
}

#[derive(Args)]
struct ShareArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,
    /// Heading for text and chat formats
    #[arg(long)]
    header: Option<String>,
    /// Mail recipients for the mailto format, comma-separated
    #[arg(long, value_delimiter = ',')]
    recipients: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Text,
    Voting,
    Slack,
    Teams,
    Mailto,
}

/// Request file. Everything is optional so that unset fields fall through
/// to the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RequestFile {
    range_start: Option<Timestamp>,
    range_end: Option<Timestamp>,
    weekdays: Option<WeekdaySet>,
    time_window: Option<TimeWindow>,
    shape: Option<SlotShape>,
    exclude_all_day_events: Option<bool>,
    exclude_holidays: Option<bool>,
    #[serde(default)]
    busy: Vec<BusySlot>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BusyInput {
    Bare(Vec<BusySlot>),
    Response(FreeBusyResponse),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlotsInput {
    Bare(Vec<OfferedSlot>),
    Outcome { slots: Vec<OfferedSlot> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Search(args) => run_search(&args, &config)?,
        Commands::Format {
            input,
            output,
            share,
        } => {
            let json = read_input(input.as_deref())?;
            let slots = match serde_json::from_str::<SlotsInput>(&json)
                .context("Failed to parse slots JSON")?
            {
                SlotsInput::Bare(slots) | SlotsInput::Outcome { slots } => slots,
            };
            let format = share.format.or(config.share.format).unwrap_or(OutputFormat::Text);
            let outcome = SearchOutcome {
                slots,
                excluded_holidays: Vec::new(),
            };
            let rendered = render(&outcome, format, &share, &config, false)?;
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Holidays {
            holidays,
            from,
            until,
        } => {
            let calendar = holiday_calendar(holidays.as_deref(), &config)?;
            let range = DateRange::new(from, until)?;
            for holiday in calendar.within(&range) {
                println!("{}  {}", holiday.date, holiday.name);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run_search(args: &SearchArgs, config: &Config) -> Result<()> {
    let mut file = if args.input.is_none() && args.start.is_some() && args.end.is_some() {
        RequestFile::default()
    } else {
        let json = read_input(args.input.as_deref())?;
        if json.trim().is_empty() {
            RequestFile::default()
        } else {
            serde_json::from_str(&json).context("Failed to parse request JSON")?
        }
    };

    let mut busy = std::mem::take(&mut file.busy);
    for path in &args.busy {
        busy.extend(read_busy(path)?);
    }

    let request = build_request(file, config, args)?;
    let holidays = if request.exclude_holidays {
        let calendar = holiday_calendar(args.holidays.as_deref(), config)?;
        if calendar.is_empty() {
            warn!("holiday exclusion requested but no holiday table is configured");
        }
        calendar
    } else {
        HolidayCalendar::new()
    };

    debug!(busy = busy.len(), holidays = holidays.len(), "running search");
    let outcome =
        find_offered_slots(&busy, &request, &holidays).context("Availability search failed")?;

    for holiday in &outcome.excluded_holidays {
        eprintln!("Excluded holiday: {} {}", holiday.date, holiday.name);
    }

    let format = args
        .share
        .format
        .or(config.share.format)
        .unwrap_or(OutputFormat::Json);
    let rendered = render(&outcome, format, &args.share, config, args.merge_contiguous)?;
    write_output(args.output.as_deref(), &rendered)
}

/// Layer request settings: flags over the request file over the config.
fn build_request(file: RequestFile, config: &Config, args: &SearchArgs) -> Result<SearchRequest> {
    let Some(range_start) = args.start.or(file.range_start) else {
        bail!("No range start: set range_start in the request or pass --start");
    };
    let Some(range_end) = args.end.or(file.range_end) else {
        bail!("No range end: set range_end in the request or pass --end");
    };

    let mut request = SearchRequest::new(range_start, range_end);

    if let Some(weekdays) = file.weekdays.or(config.weekdays) {
        request.weekdays = weekdays;
    }
    if let Some(indices) = &args.weekdays {
        request.weekdays = WeekdaySet::from_indices(indices)?;
    }

    if let Some(window) = file.time_window.or(config.time_window) {
        request.time_window = window;
    }
    if let Some(window) = &args.window {
        request.time_window = parse_window(window)?;
    }

    if let Some(shape) = file.shape.or(config.shape) {
        request.shape = shape;
    }
    if let Some(minutes) = args.duration {
        request.shape = SlotShape::Fixed { minutes };
    }
    if let Some(min_minutes) = args.min_duration {
        request.shape = SlotShape::Free { min_minutes };
    }

    request.exclude_all_day_events = args.exclude_all_day
        || file
            .exclude_all_day_events
            .or(config.exclude_all_day_events)
            .unwrap_or(false);
    request.exclude_holidays = args.exclude_holidays
        || file
            .exclude_holidays
            .or(config.exclude_holidays)
            .unwrap_or(false);

    Ok(request)
}

fn parse_window(raw: &str) -> Result<TimeWindow> {
    let Some((start, end)) = raw.split_once('-') else {
        bail!("Invalid window '{}': expected HH:MM-HH:MM", raw);
    };
    Ok(TimeWindow::parse(start.trim(), end.trim())?)
}

fn read_busy(path: &str) -> Result<Vec<BusySlot>> {
    let json = read_input(Some(path))?;
    let input: BusyInput = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse busy intervals: {}", path))?;
    Ok(match input {
        BusyInput::Bare(busy) => busy,
        BusyInput::Response(response) => response.all_busy(),
    })
}

/// `--holidays` if given, otherwise whatever the config provides.
fn holiday_calendar(path: Option<&Path>, config: &Config) -> Result<HolidayCalendar> {
    match path {
        Some(path) => load_holiday_file(path),
        None => config.holiday_calendar(),
    }
}

fn render(
    outcome: &SearchOutcome,
    format: OutputFormat,
    share: &ShareArgs,
    config: &Config,
    merge_contiguous: bool,
) -> Result<String> {
    let header = share.header.as_deref().or(config.share.header.as_deref());

    let text = match format {
        OutputFormat::Json if merge_contiguous => {
            let merged = SearchOutcome {
                slots: merge_contiguous_slots(&outcome.slots),
                excluded_holidays: outcome.excluded_holidays.clone(),
            };
            serde_json::to_string_pretty(&merged)?
        }
        OutputFormat::Json => serde_json::to_string_pretty(outcome)?,
        OutputFormat::Mailto => {
            if share.recipients.is_empty() {
                bail!("The mailto format needs at least one address in --recipients");
            }
            let recipients: Vec<&str> = share.recipients.iter().map(String::as_str).collect();
            format_as_mailto(&outcome.slots, &recipients, header)
        }
        OutputFormat::Text => ShareFormat::Text.render(&outcome.slots, header),
        OutputFormat::Voting => ShareFormat::Voting.render(&outcome.slots, header),
        OutputFormat::Slack => ShareFormat::Slack.render(&outcome.slots, header),
        OutputFormat::Teams => ShareFormat::Teams.render(&outcome.slots, header),
    };

    Ok(format!("{}\n", text.trim_end_matches('\n')))
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
            print!("{}", content);
        }
    }
    Ok(())
}
