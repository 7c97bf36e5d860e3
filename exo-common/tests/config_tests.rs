//! Integration tests for bootstrap configuration loading
//!
//! Tests that manipulate XDG_CONFIG_HOME are marked with #[serial]
//! so they do not race each other.

use exo_common::config::{Overrides, TomlConfig};
use exo_common::Error;
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_from_file_reads_all_sections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exo.toml");
    fs::write(
        &path,
        r#"
host = "0.0.0.0"
port = 8123
images_dir = "/srv/exo/images"
output_dir = "/srv/exo/output"
log_file = "votes.csv"

[logging]
level = "debug"

[session]
resume_from_log = true
"#,
    )
    .unwrap();

    let config = TomlConfig::from_file(&path).unwrap();

    assert_eq!(config.bind_addr(), "0.0.0.0:8123");
    assert_eq!(config.images_dir, PathBuf::from("/srv/exo/images"));
    assert_eq!(config.output_dir, PathBuf::from("/srv/exo/output"));
    assert_eq!(config.log_file, "votes.csv");
    assert_eq!(config.logging.level, "debug");
    assert!(config.session.resume_from_log);
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = TomlConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exo.toml");
    fs::write(&path, "port = \"not a number\"\n").unwrap();

    let result = TomlConfig::from_file(&path);
    assert!(matches!(result, Err(Error::Parse(_))));
}

#[test]
fn test_overrides_applied_after_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("exo.toml");
    fs::write(&path, "port = 8123\nhost = \"10.0.0.1\"\n").unwrap();

    let config = TomlConfig::from_file(&path)
        .unwrap()
        .apply(Overrides {
            port: Some(9999),
            ..Overrides::default()
        })
        .unwrap();

    assert_eq!(config.bind_addr(), "10.0.0.1:9999");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_load_finds_user_config_dir() {
    let dir = TempDir::new().unwrap();
    let exo_dir = dir.path().join("exo");
    fs::create_dir_all(&exo_dir).unwrap();
    fs::write(exo_dir.join("config.toml"), "port = 7001\n").unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    let config = TomlConfig::load(None);

    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    let (config, source) = config.unwrap();
    assert_eq!(config.port, 7001);
    assert_eq!(source, Some(exo_dir.join("config.toml")));
}
