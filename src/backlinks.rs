//! Backlink generation.
//!
//! Each link in a source task's contents names a target task. The target gets
//! the source's path recorded under its `backlinks` metadata key. Targets are
//! processed independently: one broken link is reported and the rest still
//! run.

use crate::links::{extract_links, is_external};
use crate::store::{Store, normalize_path};
use crate::types::{Meta, Value};
use eyre::{Context, Report, Result};
use log::{debug, info, warn};

/// Metadata key that collects back-references.
pub const BACKLINKS_KEY: &str = "backlinks";

/// A target that could not be updated.
#[derive(Debug)]
pub struct BacklinkFailure {
    pub target: String,
    pub error: Report,
}

/// Outcome of a backlink run.
#[derive(Debug, Default)]
pub struct BacklinkReport {
    /// Targets that gained a back-reference.
    pub updated: Vec<String>,
    /// Targets that already referenced the source.
    pub unchanged: Vec<String>,
    /// Link targets that are not tasks (external URLs, the source itself).
    pub skipped: Vec<String>,
    pub failures: Vec<BacklinkFailure>,
}

/// Record `source` as a backlink in every task it links to.
///
/// Fails only if the source itself cannot be loaded; per-target failures are
/// collected in the report. The source task is never rewritten.
pub fn generate_backlinks(store: &Store, source_path: &str) -> Result<BacklinkReport> {
    let source = store
        .load(source_path)
        .wrap_err_with(|| format!("Failed to load source task {}", source_path))?;

    let mut report = BacklinkReport::default();

    for link in extract_links(&source.contents) {
        if is_external(&link.target) {
            debug!("Skipping external link {}", link.target);
            report.skipped.push(link.target);
            continue;
        }

        let target = normalize_path(&link.target);
        if target.is_empty() || target == source.path {
            report.skipped.push(link.target);
            continue;
        }

        match link_back(store, &target, &source.path) {
            Ok(true) => {
                info!("Added backlink {} -> {}", target, source.path);
                report.updated.push(target);
            }
            Ok(false) => report.unchanged.push(target),
            Err(error) => {
                warn!("Failed to add backlink to {}: {:#}", target, error);
                report.failures.push(BacklinkFailure { target, error });
            }
        }
    }

    Ok(report)
}

fn link_back(store: &Store, target: &str, source: &str) -> Result<bool> {
    let mut task = store.load(target)?;
    if !add_backlink(&mut task.meta, source) {
        return Ok(false);
    }
    store.save(&task)?;
    Ok(true)
}

/// Append `source` to the `backlinks` sequence in `meta`.
///
/// A missing key becomes a one-element sequence and a scalar is promoted to a
/// sequence. Returns false when `source` is already listed.
pub fn add_backlink(meta: &mut Meta, source: &str) -> bool {
    let entry = Value::from(source);

    let mut refs = match meta.remove(BACKLINKS_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(refs)) => refs,
        Some(other) => vec![other],
    };

    let added = !refs.contains(&entry);
    if added {
        refs.push(entry);
    }
    meta.insert(BACKLINKS_KEY.to_string(), Value::Sequence(refs));

    added
}
