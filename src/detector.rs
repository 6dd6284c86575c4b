//! Full-text change tripwire for the monitored page.
//!
//! The current markup is compared character by character against the last
//! saved snapshot. A similarity below the threshold counts as a structural
//! change: the operator is alerted and the snapshot replaced.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::fetcher::Fetch;
use crate::notifier::{Notifier, notify};
use crate::similarity;

pub const DEFAULT_THRESHOLD: f64 = 0.95;

pub const CHANGE_ALERT: &str = "Структура сайта изменилась!";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    FetchFailed,
    /// No snapshot existed; the current page became the baseline.
    Bootstrapped,
    Unchanged { similarity: f64 },
    Changed { similarity: f64 },
}

pub fn check_for_changes(
    fetcher: &dyn Fetch,
    notifier: &dyn Notifier,
    url: &str,
    snapshot: &Path,
    threshold: f64,
) -> Result<Outcome> {
    let current = match fetcher.fetch(url) {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Page load failed, skipping change check");
            return Ok(Outcome::FetchFailed);
        }
    };

    let Some(previous) = read_snapshot(snapshot)? else {
        info!(path = %snapshot.display(), "No snapshot yet, saving current page");
        write_snapshot(snapshot, &current)?;
        return Ok(Outcome::Bootstrapped);
    };

    let similarity = similarity::ratio(&previous, &current);
    info!(similarity = %format!("{:.2}%", similarity * 100.0), "Compared with saved snapshot");

    if similarity < threshold {
        warn!("Site structure changed, replacing snapshot");
        notify(notifier, CHANGE_ALERT);
        write_snapshot(snapshot, &current)?;
        Ok(Outcome::Changed { similarity })
    } else {
        info!("No changes detected");
        Ok(Outcome::Unchanged { similarity })
    }
}

/// Saves the current page as the baseline, whatever is stored now.
/// Returns `false` if the page could not be loaded.
pub fn save_snapshot(fetcher: &dyn Fetch, url: &str, snapshot: &Path) -> Result<bool> {
    match fetcher.fetch(url) {
        Ok(html) => {
            write_snapshot(snapshot, &html)?;
            info!(path = %snapshot.display(), "Snapshot saved");
            Ok(true)
        }
        Err(e) => {
            warn!(error = %e, "Page load failed, snapshot not saved");
            Ok(false)
        }
    }
}

/// Similarity of the live page to the snapshot, without touching either.
pub fn compare_with_snapshot(fetcher: &dyn Fetch, url: &str, snapshot: &Path) -> Result<Option<f64>> {
    let current = match fetcher.fetch(url) {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "Page load failed");
            return Ok(None);
        }
    };

    match read_snapshot(snapshot)? {
        Some(previous) => Ok(Some(similarity::ratio(&previous, &current))),
        None => {
            warn!(path = %snapshot.display(), "No snapshot to compare with, save one first");
            Ok(None)
        }
    }
}

fn read_snapshot(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(html) => Ok(Some(html)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading snapshot {}", path.display())),
    }
}

fn write_snapshot(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html).with_context(|| format!("writing snapshot {}", path.display()))
}
