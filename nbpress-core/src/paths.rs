//! Derives every path a publish run touches from the notebook path alone.

use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::config::{AssetLayout, PublishConfig};
use crate::error::PublishError;

pub const NOTEBOOK_EXTENSION: &str = "ipynb";
pub const ASSET_DIR_SUFFIX: &str = "_files";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// The notebook as given on the command line.
    pub source: PathBuf,
    /// File name without the `.ipynb` extension.
    pub stem: String,
    /// Directory containing the notebook. Empty for a bare file name, so joined
    /// paths stay relative to the working directory (`demo_files`, not `./demo_files`).
    pub source_dir: PathBuf,
    /// `<source_dir>/<stem>_files`, written by the converter.
    pub generated_assets: PathBuf,
    /// Final home of the asset folder under the site's asset root.
    pub relocated_assets: PathBuf,
    /// `<source_dir>/<stem>.<extension>`, written by the converter.
    pub converted_document: PathBuf,
    /// URL path (without leading `/`) of the directory holding `<stem>_files`
    /// once relocated. Prepended to every rewritten image reference.
    pub asset_url_prefix: String,
}

impl ResolvedPaths {
    pub fn resolve(source: &Path, config: &PublishConfig) -> Result<Self, PublishError> {
        if source.as_os_str().is_empty() {
            return Err(PublishError::InvalidInput(
                "notebook path not specified".to_string(),
            ));
        }
        if !source.exists() {
            error!(path = %source.display(), "Notebook does not exist");
            return Err(PublishError::NotFound(source.to_path_buf()));
        }

        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let is_notebook = source
            .extension()
            .is_some_and(|ext| ext == NOTEBOOK_EXTENSION);
        if !is_notebook {
            error!(path = %source.display(), "Not a jupyter notebook");
            return Err(PublishError::InvalidInput(format!(
                "\"{file_name}\" is not a jupyter notebook"
            )));
        }

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                PublishError::InvalidInput(format!(
                    "notebook name {file_name:?} is not valid UTF-8"
                ))
            })?
            .to_string();

        let source_dir = source.parent().map(Path::to_path_buf).unwrap_or_default();
        let asset_dir_name = format!("{stem}{ASSET_DIR_SUFFIX}");

        let mut asset_parent = config.site_root.join(config.asset_root.as_str());
        let mut asset_url_prefix = config.asset_root.as_str().to_string();
        if config.layout == AssetLayout::Nested {
            let dir_name = notebook_dir_name(source)?;
            asset_parent.push(&dir_name);
            asset_url_prefix = format!("{asset_url_prefix}/{dir_name}");
        }

        let resolved = Self {
            source: source.to_path_buf(),
            generated_assets: source_dir.join(&asset_dir_name),
            relocated_assets: asset_parent.join(&asset_dir_name),
            converted_document: source_dir
                .join(format!("{stem}.{}", config.converter.target_extension)),
            source_dir,
            stem,
            asset_url_prefix,
        };
        debug!(?resolved, "Resolved notebook paths");
        Ok(resolved)
    }
}

/// Name of the directory the notebook lives in, resolving `.` and bare file
/// names through the filesystem.
fn notebook_dir_name(source: &Path) -> Result<String, PublishError> {
    let canonical = std::fs::canonicalize(source).map_err(|e| PublishError::io(source, e))?;
    canonical
        .parent()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            PublishError::InvalidInput(format!(
                "cannot name the directory containing \"{}\"",
                source.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssetRoot;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn resolves_flat_layout_paths() {
        let tmp = tempdir().unwrap();
        let plots = tmp.path().join("plots");
        fs::create_dir_all(&plots).unwrap();
        let notebook = plots.join("demo.ipynb");
        fs::write(&notebook, "{}").unwrap();

        let config = PublishConfig {
            site_root: tmp.path().to_path_buf(),
            ..PublishConfig::default()
        };
        let paths = ResolvedPaths::resolve(&notebook, &config).unwrap();

        assert_eq!(paths.stem, "demo");
        assert_eq!(paths.source_dir, plots);
        assert_eq!(paths.generated_assets, plots.join("demo_files"));
        assert_eq!(paths.converted_document, plots.join("demo.md"));
        assert_eq!(
            paths.relocated_assets,
            tmp.path().join("jupyter_files").join("demo_files")
        );
        assert_eq!(paths.asset_url_prefix, "jupyter_files");
    }

    #[test]
    fn nested_layout_namespaces_by_notebook_directory() {
        let tmp = tempdir().unwrap();
        let plots = tmp.path().join("plots");
        fs::create_dir_all(&plots).unwrap();
        let notebook = plots.join("demo.ipynb");
        fs::write(&notebook, "{}").unwrap();

        let config = PublishConfig {
            site_root: tmp.path().to_path_buf(),
            asset_root: AssetRoot::new("nb").unwrap(),
            layout: AssetLayout::Nested,
            ..PublishConfig::default()
        };
        let paths = ResolvedPaths::resolve(&notebook, &config).unwrap();

        assert_eq!(
            paths.relocated_assets,
            tmp.path().join("nb").join("plots").join("demo_files")
        );
        assert_eq!(paths.asset_url_prefix, "nb/plots");
    }

    #[test]
    fn missing_notebook_is_not_found() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("missing.ipynb");
        let err = ResolvedPaths::resolve(&missing, &PublishConfig::default()).unwrap_err();
        assert!(matches!(err, PublishError::NotFound(p) if p == missing));
    }

    #[test]
    fn wrong_extension_is_invalid_input() {
        let tmp = tempdir().unwrap();
        let text = tmp.path().join("notes.txt");
        fs::write(&text, "hello").unwrap();
        let err = ResolvedPaths::resolve(&text, &PublishConfig::default()).unwrap_err();
        match err {
            PublishError::InvalidInput(msg) => assert!(msg.contains("notes.txt")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn empty_path_is_invalid_input() {
        let err = ResolvedPaths::resolve(Path::new(""), &PublishConfig::default()).unwrap_err();
        assert!(matches!(err, PublishError::InvalidInput(_)));
    }
}
