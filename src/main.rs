mod archiver;
mod detector;
mod fetcher;
mod listing;
#[cfg(test)]
mod local_http;
mod models;
mod notifier;
mod pagination;
mod parser;
mod pipeline;
mod schedule;
mod settings;
mod similarity;

use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use fetcher::{Fetch, HttpFetcher};
use notifier::TelegramNotifier;
use schedule::DailySchedule;
use settings::Settings;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "kivano_watch", about = "Daily product listing scraper with a page change tripwire")]
struct Cli {
    /// Settings file (any format the config crate reads); defaults to ./kivano_watch.*
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check for changes, scrape every page and save the table once, now
    Run,
    /// Run once a day at the configured time (default)
    Watch,
    /// Save the current page as the comparison baseline
    Snapshot,
    /// Print how similar the live page is to the saved baseline
    Compare,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let fetcher = HttpFetcher::new()?;

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Run => {
            let report = run_once(&fetcher, &settings)?;
            info!(outcome = ?report.outcome, products = report.products, "Run finished");
        }
        Commands::Watch => watch(&fetcher, &settings)?,
        Commands::Snapshot => take_snapshot(&fetcher, &settings.url, &settings.snapshot_path)?,
        Commands::Compare => {
            match detector::compare_with_snapshot(&fetcher, &settings.url, &settings.snapshot_path)? {
                Some(similarity) => println!("Similarity with saved snapshot: {:.2}%", similarity * 100.0),
                None => println!("Nothing to compare"),
            }
        }
    }
    Ok(())
}

fn take_snapshot(fetcher: &dyn Fetch, url: &str, path: &Path) -> Result<()> {
    if !detector::save_snapshot(fetcher, url, path)? {
        bail!("could not load {url}, snapshot not saved");
    }
    println!("Snapshot saved to {}", path.display());
    Ok(())
}

fn run_once(fetcher: &HttpFetcher, settings: &Settings) -> Result<pipeline::Report> {
    let notifier = TelegramNotifier::new(settings.telegram_bot_token.clone(), settings.telegram_chat_id.clone());
    let job = pipeline::Job {
        url: &settings.url,
        snapshot_path: &settings.snapshot_path,
        output_path: &settings.output_path,
        threshold: settings.threshold,
    };
    pipeline::run(fetcher, &notifier, &job)
}

fn watch(fetcher: &HttpFetcher, settings: &Settings) -> Result<()> {
    let at = schedule::parse_time(&settings.schedule_at)?;
    let mut schedule = DailySchedule::new(at, Local::now().naive_local());
    info!(next_run = %schedule.next_run(), "Waiting for the daily run");

    loop {
        let now = Local::now().naive_local();
        if schedule.is_due(now) {
            if let Err(e) = run_once(fetcher, settings) {
                error!(error = %format!("{e:#}"), "Daily run failed, retrying tomorrow");
            }
            schedule.mark_ran(Local::now().naive_local());
            info!(next_run = %schedule.next_run(), "Waiting for the daily run");
        }
        thread::sleep(POLL_INTERVAL);
    }
}
