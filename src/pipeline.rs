use std::path::Path;

use anyhow::Result;
use tracing::{error, info};

use crate::archiver;
use crate::detector::{self, Outcome};
use crate::fetcher::Fetch;
use crate::listing;
use crate::notifier::Notifier;

pub struct Job<'a> {
    pub url: &'a str,
    pub snapshot_path: &'a Path,
    pub output_path: &'a Path,
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    /// `None` when the change check itself failed.
    pub outcome: Option<Outcome>,
    pub products: usize,
}

/// One full run: change check, then scrape, then save.
///
/// A failed change check is logged and the scrape goes ahead regardless.
pub fn run(fetcher: &dyn Fetch, notifier: &dyn Notifier, job: &Job<'_>) -> Result<Report> {
    let outcome = match detector::check_for_changes(fetcher, notifier, job.url, job.snapshot_path, job.threshold) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Change check failed");
            None
        }
    };

    let all_products = listing::scrape_all_pages(fetcher, job.url);
    let products = archiver::save_to_csv(&all_products, job.output_path)?;
    info!(products, path = %job.output_path.display(), "Data saved");

    Ok(Report { outcome, products })
}
