use nbpress::load_config::{
    apply_env_overrides, load_config, resolve_config, ENV_ASSET_ROOT, ENV_CONVERTER,
    ENV_SITE_ROOT,
};
use nbpress_core::config::{AssetLayout, PublishConfig};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var(ENV_ASSET_ROOT);
    env::remove_var(ENV_SITE_ROOT);
    env::remove_var(ENV_CONVERTER);
}

#[test]
#[serial]
fn test_load_config_full_file() {
    let config_yaml = r#"
asset_root: notebook_images
site_root: ./site
layout: nested
converter:
  program: /opt/conda/bin/jupyter
  to: markdown
  extension: md
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.asset_root.as_str(), "notebook_images");
    assert_eq!(config.site_root, PathBuf::from("./site"));
    assert_eq!(config.layout, AssetLayout::Nested);
    assert_eq!(config.converter.program, "/opt/conda/bin/jupyter");
    assert_eq!(config.converter.target_format, "markdown");
    assert_eq!(config.converter.target_extension, "md");
}

#[test]
#[serial]
fn test_load_config_partial_file_keeps_defaults() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "layout: flat\n").unwrap();

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config, PublishConfig::default());
}

#[test]
#[serial]
fn test_load_config_empty_file_is_default() {
    let config_file = NamedTempFile::new().expect("temp file");
    let config = load_config(config_file.path()).expect("Empty config should load");
    assert_eq!(config, PublishConfig::default());
}

#[test]
#[serial]
fn test_load_config_rejects_asset_root_with_separator() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "asset_root: assets/jupyter\n").unwrap();

    let err = load_config(config_file.path()).expect_err("separator must be rejected");
    assert!(
        err.to_string().contains("path separator"),
        "unexpected error: {err}"
    );
}

#[test]
#[serial]
fn test_load_config_missing_file_errors() {
    let err = load_config("/definitely/not/here/nbpress.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
#[serial]
fn test_env_overrides_take_precedence() {
    clear_env();
    env::set_var(ENV_ASSET_ROOT, "images");
    env::set_var(ENV_SITE_ROOT, "/srv/blog");
    env::set_var(ENV_CONVERTER, "jupyter-lab");

    let config = apply_env_overrides(PublishConfig::default()).expect("overrides apply");
    clear_env();

    assert_eq!(config.asset_root.as_str(), "images");
    assert_eq!(config.site_root, PathBuf::from("/srv/blog"));
    assert_eq!(config.converter.program, "jupyter-lab");
}

#[test]
#[serial]
fn test_env_asset_root_is_validated() {
    clear_env();
    env::set_var(ENV_ASSET_ROOT, "a/b");
    let result = apply_env_overrides(PublishConfig::default());
    clear_env();

    let err = result.expect_err("invalid env asset root must fail");
    assert!(format!("{err:#}").contains("path separator"));
}

#[test]
#[serial]
fn test_resolve_config_without_file_uses_defaults() {
    clear_env();
    let config = resolve_config(None).expect("defaults resolve");
    assert_eq!(config, PublishConfig::default());
}
