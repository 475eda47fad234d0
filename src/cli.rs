use crate::aggregate::{AggregateOutcome, ProgressEvent, ResultAggregator};
use crate::config::{self, Config};
use crate::logging;
use crate::prompt::{self, SearchRequest, TerminalPrompter};
use crate::report::{self, Summary};
use crate::search::providers::YouTubeClient;
use crate::search::{SearchQuery, VideoSource};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Find YouTube videos with few views and save them to CSV.
///
/// Without `--term` the search term and date bounds are asked interactively.
#[derive(Debug, Parser)]
#[command(name = "lowview", version, about)]
pub struct Args {
    /// Search term (skips the interactive prompts)
    #[arg(short, long)]
    pub term: Option<String>,

    /// Only videos published on or after this date
    #[arg(long, value_name = "YYYY-MM-DD", requires = "term")]
    pub after: Option<String>,

    /// Only videos published before this date
    #[arg(long, value_name = "YYYY-MM-DD", requires = "term")]
    pub before: Option<String>,

    /// Keep videos with at most this many views
    #[arg(long, value_name = "COUNT")]
    pub max_views: Option<u64>,

    /// Directory for the CSV report
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write debug logs
    #[arg(long)]
    pub debug: bool,
}

/// What a finished run produced
#[derive(Debug)]
pub struct RunReport {
    pub outcome: AggregateOutcome,
    /// Path of the CSV file, `None` when there was nothing to save
    pub saved_to: Option<PathBuf>,
}

/// Binary entry point
pub async fn run() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_from(path)?,
        None => config::load_or_create_config()?,
    };
    config.apply_env_overrides();
    if args.debug {
        config.debug = true;
    }
    let _log_guard = logging::init(&config)?;

    let request = match args.term.clone() {
        Some(term) => SearchRequest {
            term,
            after_date: args.after.clone(),
            before_date: args.before.clone(),
        },
        None => prompt::collect_request(&mut TerminalPrompter)?,
    };
    let query = SearchQuery::new(
        request.term,
        request.after_date.as_deref(),
        request.before_date.as_deref(),
    )?;

    let settings = RunSettings::resolve(&args, &config);
    let client = YouTubeClient::from_config(&config).context("Failed to create YouTube client")?;

    execute(&client, &query, settings.max_view_count, &settings.output_dir).await?;
    Ok(())
}

struct RunSettings {
    max_view_count: u64,
    output_dir: PathBuf,
}

impl RunSettings {
    fn resolve(args: &Args, config: &Config) -> Self {
        Self {
            max_view_count: args.max_views.unwrap_or(config.max_view_count),
            output_dir: args
                .output_dir
                .clone()
                .unwrap_or_else(|| config.output_dir.clone()),
        }
    }
}

/// Run one search end to end: page, filter, summarize, save.
///
/// A search failure is reported and the records gathered before it are
/// still summarized and saved. Only a failure to write the report is
/// returned as an error.
pub async fn execute<S: VideoSource + ?Sized>(
    source: &S,
    query: &SearchQuery,
    max_view_count: u64,
    output_dir: &Path,
) -> Result<RunReport> {
    tracing::info!(
        query = %query.term,
        after = ?query.after,
        before = ?query.before,
        max_view_count,
        "starting search"
    );

    let outcome = ResultAggregator::new(source)
        .with_max_view_count(max_view_count)
        .run_with_progress(query, print_progress)
        .await;

    if let Some(e) = &outcome.error {
        println!("Error:");
        println!("{e}");
    }

    let summary = Summary {
        query,
        record_count: outcome.records.len(),
        errored: outcome.is_errored(),
    };
    println!("{summary}");

    let saved_to = report::save_csv(&outcome.records, output_dir)?;
    if let Some(path) = &saved_to {
        println!("\nResults saved to: {}", path.display());
    }

    Ok(RunReport { outcome, saved_to })
}

fn print_progress(event: ProgressEvent) {
    match event {
        ProgressEvent::FetchingPage { token: None } => println!("Searching for results..."),
        ProgressEvent::FetchingPage { token: Some(token) } => {
            println!("Searching next page: {token}")
        }
        ProgressEvent::PageDone { total_records, .. } => {
            println!("Current result count: {total_records}")
        }
    }
}
