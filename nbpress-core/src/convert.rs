//! # convert: boundary to the external notebook converter
//!
//! The pipeline never converts notebooks itself. It calls a [`Converter`], which
//! for real runs is [`NbConvert`] (`jupyter nbconvert --to markdown <notebook>`).
//!
//! ## Contract
//! - The converter writes `<stem>.<extension>` next to the notebook, and
//!   `<stem>_files/` only when the notebook has image output.
//! - A converter that exits non-zero is reported through
//!   [`ConversionOutcome::success`] and is not an error. The run continues and a
//!   broken conversion shows up later as a missing converted document.
//! - Only a converter that cannot be launched at all is a [`ConvertError`].
//! - The converter's stdout is sent to our stderr.
//!
//! ## Mocking & Testing
//! The trait is annotated for `mockall`; tests drive the pipeline with
//! `MockConverter` and write the converter's output files themselves.

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::paths::ResolvedPaths;

/// What happened when the converter ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionOutcome {
    /// Human-readable command line that was executed.
    pub command: String,
    /// Whether the process exited successfully.
    pub success: bool,
    pub exit_code: Option<i32>,
}

#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Converter: Send + Sync {
    /// The command line [`Converter::convert`] runs for these paths. Shown in dry runs.
    fn command_line(&self, paths: &ResolvedPaths) -> String;

    /// Convert the notebook at `paths.source`, waiting for the converter to finish.
    async fn convert(&self, paths: &ResolvedPaths) -> Result<ConversionOutcome, ConvertError>;
}

/// Runs `<program> nbconvert --to <format> <notebook>`, stdout redirected to stderr.
pub struct NbConvert {
    config: ConverterConfig,
}

impl NbConvert {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    fn args(&self, paths: &ResolvedPaths) -> Vec<String> {
        vec![
            "nbconvert".to_string(),
            "--to".to_string(),
            self.config.target_format.clone(),
            paths.source.display().to_string(),
        ]
    }
}

#[async_trait]
impl Converter for NbConvert {
    fn command_line(&self, paths: &ResolvedPaths) -> String {
        let mut parts = vec![self.config.program.clone()];
        parts.extend(self.args(paths));
        parts.join(" ")
    }

    async fn convert(&self, paths: &ResolvedPaths) -> Result<ConversionOutcome, ConvertError> {
        let command = self.command_line(paths);
        info!(command = %command, "Running notebook converter");

        let status = Command::new(&self.config.program)
            .arg("nbconvert")
            .arg("--to")
            .arg(&self.config.target_format)
            .arg(&paths.source)
            // keep our stdout free for the caller's report
            .stdout(std::io::stderr())
            .status()
            .await
            .map_err(|source| ConvertError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        if status.success() {
            info!(command = %command, status = ?status, "Converter finished");
        } else {
            warn!(
                command = %command,
                status = ?status,
                "Converter exited with non-zero code: {}", status
            );
        }

        Ok(ConversionOutcome {
            command,
            success: status.success(),
            exit_code: status.code(),
        })
    }
}
