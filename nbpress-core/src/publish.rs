//! High-level pipeline: orchestrates convert → relocate → rewrite for one notebook.
//!
//! This module provides the top-level orchestration for publishing a notebook as a
//! blog post. A run:
//!   - Resolves every derived path from the notebook path ([`ResolvedPaths`])
//!   - Runs the external converter through a [`Converter`]
//!   - Moves `<stem>_files/` under the site's asset root, if the converter made one
//!   - Rewrites `![png](...)` references in the converted document to the new location
//!
//! # Responsibilities
//! - Strictly sequential and fail-fast: the first error ends the run, nothing is
//!   rolled back
//! - References are only rewritten when an asset folder was found
//! - In dry-run mode nothing on disk changes; the messages name what would happen
//! - User-facing messages go to the caller's [`Progress`] sink, never to stdout directly
//!
//! # Navigation
//! - Main entrypoint: [`publish`]
//! - Supporting types: [`PublishOptions`], [`PublishReport`]

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::PublishConfig;
use crate::convert::Converter;
use crate::error::PublishError;
use crate::paths::ResolvedPaths;
use crate::progress::Progress;
use crate::relocate::{relocate_assets, Relocation};
use crate::rewrite::rewrite_document;

#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Report intended operations without running the converter or touching files.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub source: PathBuf,
    pub converted_document: PathBuf,
    pub conversion_command: String,
    /// `None` when the converter was not run (dry run).
    pub converter_succeeded: Option<bool>,
    pub relocation: Relocation,
    pub rewritten_references: usize,
    pub dry_run: bool,
}

pub async fn publish<C, P>(
    config: &PublishConfig,
    converter: &C,
    source: &Path,
    options: PublishOptions,
    progress: &P,
) -> Result<PublishReport, PublishError>
where
    C: Converter + ?Sized,
    P: Progress + ?Sized,
{
    let dry_run = options.dry_run;
    info!(source = %source.display(), dry_run, "[PUBLISH] Starting notebook publish");
    if dry_run {
        progress.step("Testing mode! No files will be modified.");
    }

    let paths = ResolvedPaths::resolve(source, config)?;

    // --- Step 1: Convert ---
    let conversion_command = converter.command_line(&paths);
    let converter_succeeded = if dry_run {
        progress.step("Nbconvert command to run:");
        progress.step(&conversion_command);
        info!(command = %conversion_command, "[PUBLISH] Dry run: converter not invoked");
        None
    } else {
        let outcome = converter.convert(&paths).await.map_err(|e| {
            error!(error = %e, "[PUBLISH][ERROR] Converter could not be launched");
            PublishError::from(e)
        })?;
        if !outcome.success {
            warn!(
                command = %outcome.command,
                exit_code = ?outcome.exit_code,
                "[PUBLISH] Converter reported failure, continuing"
            );
        }
        Some(outcome.success)
    };

    // --- Step 2: Relocate ---
    let relocation = relocate_assets(
        &paths.generated_assets,
        &paths.relocated_assets,
        dry_run,
        progress,
    )?;

    // --- Step 3: Rewrite ---
    let rewritten_references = if relocation.has_assets() {
        rewrite_document(
            &paths.converted_document,
            &paths.asset_url_prefix,
            dry_run,
            progress,
        )
        .map_err(|e| {
            error!(error = %e, path = %paths.converted_document.display(), "[PUBLISH][ERROR] Rewrite failed");
            e
        })?
    } else {
        0
    };

    let report = PublishReport {
        source: paths.source.clone(),
        converted_document: paths.converted_document.clone(),
        conversion_command,
        converter_succeeded,
        relocation,
        rewritten_references,
        dry_run,
    };
    match serde_json::to_string(&report) {
        Ok(json) => debug!(json = %json, "[PUBLISH] Report"),
        Err(e) => debug!(error = ?e, "[PUBLISH] Failed to serialize report"),
    }
    info!(
        converted_document = %report.converted_document.display(),
        rewritten_references,
        "[PUBLISH] Notebook publish complete"
    );
    Ok(report)
}
