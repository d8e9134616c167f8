use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::PublishError;

pub const DEFAULT_ASSET_ROOT: &str = "jupyter_files";

/// Name of the directory that collects every relocated `<stem>_files` folder.
///
/// Always a single path segment: it is used both as a directory under the site
/// root and as the first segment of the rewritten image URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetRoot(String);

impl AssetRoot {
    pub fn new(name: impl Into<String>) -> Result<Self, PublishError> {
        let name = name.into();
        if name.is_empty() {
            return Err(PublishError::Config("asset root must not be empty".into()));
        }
        if name == "." || name == ".." {
            return Err(PublishError::Config(format!(
                "asset root must name a directory, got {name:?}"
            )));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(PublishError::Config(format!(
                "asset root must not contain a path separator, got {name:?}"
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AssetRoot {
    fn default() -> Self {
        Self(DEFAULT_ASSET_ROOT.to_string())
    }
}

impl fmt::Display for AssetRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AssetRoot {
    type Error = PublishError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AssetRoot::new(value)
    }
}

impl From<AssetRoot> for String {
    fn from(root: AssetRoot) -> Self {
        root.0
    }
}

/// Where relocated asset folders land under the asset root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetLayout {
    /// `<asset-root>/<stem>_files`
    #[default]
    Flat,
    /// `<asset-root>/<notebook-dir-name>/<stem>_files`
    Nested,
}

/// How to invoke the external notebook converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub program: String,
    /// Value passed to `--to`.
    #[serde(rename = "to")]
    pub target_format: String,
    /// Extension of the document the converter writes next to the notebook.
    #[serde(rename = "extension")]
    pub target_extension: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: "jupyter".to_string(),
            target_format: "markdown".to_string(),
            target_extension: "md".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub asset_root: AssetRoot,
    /// Directory the asset root is created in. Relative paths resolve against the
    /// process working directory.
    pub site_root: PathBuf,
    pub layout: AssetLayout,
    pub converter: ConverterConfig,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            asset_root: AssetRoot::default(),
            site_root: PathBuf::from("."),
            layout: AssetLayout::default(),
            converter: ConverterConfig::default(),
        }
    }
}

impl PublishConfig {
    pub fn trace_loaded(&self) {
        info!(
            asset_root = %self.asset_root,
            site_root = %self.site_root.display(),
            layout = ?self.layout,
            converter = %self.converter.program,
            "Loaded PublishConfig"
        );
        debug!(?self, "PublishConfig loaded (full debug)");
    }
}
