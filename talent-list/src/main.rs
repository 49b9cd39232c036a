use std::fmt::Debug;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use libtalentgrid::logging::{LogSink, LoggingConfig};
use libtalentgrid::paging::{Filters, Row};
use libtalentgrid::views::{
    ApplicationFilterPatch, InterviewFilterPatch, JobFilterPatch, OfferFilterPatch, SortOrder,
    APPLICATION_STATUSES, INTERVIEW_STATUSES, JOB_STATUSES, OFFER_STATUSES,
};
use libtalentgrid::{Config, Dashboard, FetchOutcome, NoticeBus, PageSlice, TalentError, ViewKind};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "talent-list")]
#[command(version, about = "Page through a Talentgrid dashboard list")]
#[command(long_about = r#"Page through a Talentgrid dashboard list and print every row.

Pages are requested one after another ("load more") until the server
returns a short page or --max-pages is reached.

EXAMPLES:
    # All open jobs in Lyon
    talent-list jobs --status open --location lyon

    # First two pages of accepted applications, oldest first
    talent-list applications --status accepted --sort oldest --max-pages 2

    # Interviews from a given day on, as JSON
    talent-list interviews --from 2025-10-15 --format json

    # Offers as CSV for a spreadsheet
    talent-list offers --format csv > offers.csv

    # Try it without a server
    talent-list jobs --demo

FILTERS:
    --status     all views
    --title      jobs
    --location   jobs
    --job-id     applications
    --from       interviews

OUTPUT FORMATS:
    text  - One row per line, fields separated by " | " (default)
    json  - JSON array
    jsonl - JSON lines, one row per line
    csv   - CSV with headers

EXIT CODES:
    0 - Success (including empty results)
    1 - Error (network, server, configuration)
    2 - Session expired
    3 - Invalid input
"#)]
struct Args {
    /// Dashboard to list (jobs, applications, interviews, offers)
    #[arg(value_name = "VIEW")]
    view: String,

    /// Only rows with this status (case-insensitive)
    #[arg(short, long, value_name = "STATUS")]
    status: Option<String>,

    /// Jobs whose title contains this text
    #[arg(short, long, value_name = "TEXT")]
    title: Option<String>,

    /// Jobs whose country or city contains this text
    #[arg(short, long, value_name = "TEXT")]
    location: Option<String>,

    /// Applications to this job
    #[arg(long, value_name = "ID")]
    job_id: Option<String>,

    /// Interviews on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    from: Option<String>,

    /// Sort order: newest or oldest
    #[arg(long, default_value = "newest", value_name = "ORDER")]
    sort: String,

    /// Stop after this many pages
    #[arg(short = 'n', long, value_name = "N")]
    max_pages: Option<u32>,

    /// Output format: text, json, jsonl or csv
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: String,

    /// List generated sample data instead of calling the API
    #[arg(long)]
    demo: bool,

    /// Config file (defaults to ~/.config/talentgrid/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Jsonl,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = TalentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(TalentError::InvalidInput(format!(
                "Invalid format '{}'. Valid formats: text, json, jsonl, csv",
                s
            ))),
        }
    }
}

/// Serialized fields printed for each view, in column order
fn fields(view: ViewKind) -> &'static [&'static str] {
    match view {
        ViewKind::Jobs => &[
            "id",
            "title",
            "companyName",
            "country",
            "city",
            "employmentType",
            "status",
            "salary",
            "postedAt",
        ],
        ViewKind::Applications => &[
            "id",
            "jobId",
            "jobTitle",
            "applicantName",
            "status",
            "appliedAt",
        ],
        ViewKind::Interviews => &[
            "id",
            "candidateName",
            "jobTitle",
            "scheduledAt",
            "mode",
            "status",
        ],
        ViewKind::Offers => &[
            "id",
            "candidateName",
            "jobTitle",
            "salary",
            "status",
            "expiresAt",
        ],
    }
}

fn parse_status<S: Copy + Debug>(value: &str, all: &[S]) -> Result<S, TalentError> {
    all.iter()
        .copied()
        .find(|status| format!("{:?}", status).eq_ignore_ascii_case(value))
        .ok_or_else(|| {
            let valid: Vec<String> = all
                .iter()
                .map(|s| format!("{:?}", s).to_lowercase())
                .collect();
            TalentError::InvalidInput(format!(
                "Unknown status '{}'. Valid statuses: {}",
                value,
                valid.join(", ")
            ))
        })
}

fn parse_sort(value: &str) -> Result<SortOrder, TalentError> {
    match value.to_lowercase().as_str() {
        "newest" => Ok(SortOrder::Newest),
        "oldest" => Ok(SortOrder::Oldest),
        _ => Err(TalentError::InvalidInput(format!(
            "Invalid sort '{}'. Valid orders: newest, oldest",
            value
        ))),
    }
}

fn parse_date(value: &str) -> Result<String, TalentError> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| {
            TalentError::InvalidInput(format!("Invalid date '{}'. Use YYYY-MM-DD", value))
        })
}

/// Reject filters the chosen view does not have
fn check_flags(view: ViewKind, args: &Args) -> Result<(), TalentError> {
    let given = [
        ("--title", args.title.is_some(), ViewKind::Jobs),
        ("--location", args.location.is_some(), ViewKind::Jobs),
        ("--job-id", args.job_id.is_some(), ViewKind::Applications),
        ("--from", args.from.is_some(), ViewKind::Interviews),
    ];

    for (flag, present, owner) in given {
        if present && owner != view {
            return Err(TalentError::InvalidInput(format!(
                "{} only applies to {}",
                flag, owner
            )));
        }
    }

    if args.max_pages == Some(0) {
        return Err(TalentError::InvalidInput(
            "--max-pages must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Apply filters, then load more until the list ends or `max_pages` is hit
async fn load_all<T: Row, F: Filters>(
    slice: &PageSlice<T, F>,
    patch: F::Patch,
    max_pages: Option<u32>,
) -> Result<Vec<T>, TalentError> {
    let mut outcome = slice.set_filters(patch).await;
    let mut pages = 0;

    loop {
        match outcome {
            FetchOutcome::Appended { count, has_more } => {
                pages += 1;
                debug!(view = slice.name(), pages, count, "Loaded page");
                if !has_more || max_pages.is_some_and(|max| pages >= max) {
                    break;
                }
            }
            FetchOutcome::Failed(err) => return Err(err.into()),
            FetchOutcome::Skipped | FetchOutcome::Stale => break,
        }
        outcome = slice.fetch_data().await;
    }

    Ok(slice.snapshot().items)
}

fn to_values<T: Serialize>(rows: &[T]) -> serde_json::Result<Vec<Value>> {
    rows.iter().map(serde_json::to_value).collect()
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn write_rows<W: Write>(
    out: &mut W,
    view: ViewKind,
    format: OutputFormat,
    rows: &[Value],
) -> io::Result<()> {
    let fields = fields(view);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        OutputFormat::Jsonl => {
            for row in rows {
                serde_json::to_writer(&mut *out, row)?;
                writeln!(out)?;
            }
        }
        OutputFormat::Csv => {
            writeln!(out, "{}", fields.join(","))?;
            for row in rows {
                let line: Vec<String> = fields
                    .iter()
                    .map(|f| csv_field(&field_text(row.get(*f))))
                    .collect();
                writeln!(out, "{}", line.join(","))?;
            }
        }
        OutputFormat::Text => {
            for row in rows {
                let line: Vec<String> = fields.iter().map(|f| field_text(row.get(*f))).collect();
                writeln!(out, "{}", line.join(" | "))?;
            }
        }
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let view: ViewKind = args.view.parse()?;
    let format: OutputFormat = args.format.parse()?;
    let sort = parse_sort(&args.sort)?;
    check_flags(view, &args)?;
    let from_date = args.from.as_deref().map(parse_date).transpose()?;

    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let notices = NoticeBus::default();
    let dashboard = if args.demo {
        Dashboard::demo(&config, notices, Duration::ZERO)
    } else {
        Dashboard::http(&config, notices)?
    };

    let status = args.status.as_deref();
    let rows = match view {
        ViewKind::Jobs => {
            let patch = JobFilterPatch {
                status: status
                    .map(|s| parse_status(s, &JOB_STATUSES))
                    .transpose()?
                    .map(Some),
                title: args.title.clone().map(Some),
                location: args.location.clone().map(Some),
                employment_type: None,
                sort: Some(sort),
            };
            to_values(&load_all(&dashboard.jobs, patch, args.max_pages).await?)?
        }
        ViewKind::Applications => {
            let patch = ApplicationFilterPatch {
                status: status
                    .map(|s| parse_status(s, &APPLICATION_STATUSES))
                    .transpose()?
                    .map(Some),
                job_id: args.job_id.clone().map(Some),
                sort: Some(sort),
            };
            to_values(&load_all(&dashboard.applications, patch, args.max_pages).await?)?
        }
        ViewKind::Interviews => {
            let patch = InterviewFilterPatch {
                status: status
                    .map(|s| parse_status(s, &INTERVIEW_STATUSES))
                    .transpose()?
                    .map(Some),
                from_date: from_date.map(Some),
                sort: Some(sort),
            };
            to_values(&load_all(&dashboard.interviews, patch, args.max_pages).await?)?
        }
        ViewKind::Offers => {
            let patch = OfferFilterPatch {
                status: status
                    .map(|s| parse_status(s, &OFFER_STATUSES))
                    .transpose()?
                    .map(Some),
                sort: Some(sort),
            };
            to_values(&load_all(&dashboard.offers, patch, args.max_pages).await?)?
        }
    };

    debug!("Printing {} {} rows", rows.len(), view);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_rows(&mut out, view, format, &rows)?;
    out.flush()?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = LoggingConfig::from_env().install(LogSink::Stderr) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let args = Args::parse();
    debug!("talent-list started with args: {:?}", args);

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<TalentError>()
            .map_or(1, TalentError::exit_code);
        std::process::exit(code);
    }
}
