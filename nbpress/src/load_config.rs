/// `load_config` module: Loads the optional YAML config file and environment overrides into a [`PublishConfig`].
///
/// # Responsibilities
/// - Parse a user-supplied YAML file into the core's typed config (every key optional)
/// - Apply `NBPRESS_*` environment overrides on top (a `.env` file is loaded by `main`)
/// - Validate the asset root: a value with a path separator is rejected here, before any file is touched
///
/// # Errors
/// All errors in this module use `anyhow::Error` for context-rich diagnostics, and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use nbpress_core::config::{AssetRoot, PublishConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const ENV_ASSET_ROOT: &str = "NBPRESS_ASSET_ROOT";
pub const ENV_SITE_ROOT: &str = "NBPRESS_SITE_ROOT";
pub const ENV_CONVERTER: &str = "NBPRESS_CONVERTER";

/// Loads a YAML config file. Keys missing from the file keep their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PublishConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(PublishConfig::default());
    }

    match serde_yaml::from_str::<PublishConfig>(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Applies `NBPRESS_ASSET_ROOT`, `NBPRESS_SITE_ROOT` and `NBPRESS_CONVERTER` when set.
pub fn apply_env_overrides(mut config: PublishConfig) -> Result<PublishConfig> {
    if let Ok(root) = std::env::var(ENV_ASSET_ROOT) {
        config.asset_root = AssetRoot::new(root)
            .with_context(|| format!("{ENV_ASSET_ROOT} is not a valid asset root"))?;
        info!(asset_root = %config.asset_root, "Asset root taken from environment");
    }
    if let Ok(site_root) = std::env::var(ENV_SITE_ROOT) {
        config.site_root = PathBuf::from(site_root);
        info!(site_root = %config.site_root.display(), "Site root taken from environment");
    }
    if let Ok(program) = std::env::var(ENV_CONVERTER) {
        info!(program = %program, "Converter program taken from environment");
        config.converter.program = program;
    }
    Ok(config)
}

/// Config for one CLI run: the file if given, otherwise defaults, then environment overrides.
pub fn resolve_config(path: Option<&Path>) -> Result<PublishConfig> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => PublishConfig::default(),
    };
    let config = apply_env_overrides(config)?;
    config.trace_loaded();
    Ok(config)
}
