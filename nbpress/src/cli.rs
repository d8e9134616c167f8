///
/// This module implements the CLI interface for nbpress: argument parsing, config
/// resolution and the user-visible summary.
///
/// All publishing logic (path resolution, conversion, relocation, rewriting) lives in
/// the [`nbpress-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: `nbpress path/to/notebook.ipynb`, `--test` for a dry run.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`nbpress-core`]: ../../nbpress-core/
use crate::load_config::resolve_config;
use anyhow::Result;
use clap::Parser;
use nbpress_core::convert::NbConvert;
use nbpress_core::progress::{Progress, Silent};
use nbpress_core::publish::{publish, PublishOptions, PublishReport};
use nbpress_core::relocate::Relocation;
use std::path::PathBuf;

/// Convert a Jupyter notebook into a blog-ready Markdown post.
#[derive(Parser, Debug)]
#[clap(
    name = "nbpress",
    version,
    about = "Convert a Jupyter notebook to Markdown, move its images under the site's asset root and fix the image links"
)]
pub struct Cli {
    /// Path to the jupyter notebook
    pub notebook: PathBuf,

    /// Enables testing mode (no files will be modified)
    #[clap(short = 't', long = "test", visible_alias = "dry-run")]
    pub test: bool,

    /// Optional YAML config file
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON (progress messages are suppressed)
    #[clap(long)]
    pub json: bool,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!(notebook = %cli.notebook.display(), dry_run = cli.test, "Starting nbpress run");

    let config = resolve_config(cli.config.as_deref())?;
    let converter = NbConvert::new(config.converter.clone());
    let options = PublishOptions { dry_run: cli.test };
    // stdout carries either the progress messages or the JSON report, never both
    let progress: &dyn Progress = if cli.json { &Silent } else { &print_step };

    let report = match publish(&config, &converter, &cli.notebook, options, progress).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(notebook = %cli.notebook.display(), error = %e, "Publish failed");
            return Err(anyhow::Error::new(e));
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_step(message: &str) {
    println!("{message}");
}

fn print_summary(report: &PublishReport) {
    if report.dry_run {
        println!("Dry run complete, no files were modified.");
        return;
    }
    match &report.relocation {
        Relocation::Moved { to, .. } => println!(
            "Published {} ({} image reference(s) now point into {})",
            report.converted_document.display(),
            report.rewritten_references,
            to.display()
        ),
        _ => println!("Published {}", report.converted_document.display()),
    }
}
