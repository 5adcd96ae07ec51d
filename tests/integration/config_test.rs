use std::fs;
use std::path::Path;

use sysdash::core::config::Config;
use sysdash::error::SysdashError;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[thresholds]\ncpu_warning = 60\ncpu_critical = 90\n\n[collector]\ntimeout_ms = 500\nparallel = true\n",
    );

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.thresholds.cpu_warning, 60.0);
    assert_eq!(config.thresholds.cpu_critical, 90.0);
    // Untouched keys keep their defaults
    assert_eq!(config.thresholds.mem_critical, 85.0);
    assert_eq!(config.collector.timeout_ms, 500);
    assert!(config.collector.parallel);
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");
    match Config::load(Some(&path)) {
        Err(SysdashError::MissingConfig { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected MissingConfig, got {:?}", other),
    }
}

#[test]
fn test_invalid_file_names_the_key() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[thresholds]\ndisk_warning = 95\ndisk_critical = 90\n");

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, SysdashError::Configuration { ref key, .. } if key == "disk_warning"));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_malformed_toml_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[thresholds]\ncpu_warning = \"lots\"\n");
    assert!(matches!(
        Config::load(Some(Path::new(&path))),
        Err(SysdashError::Configuration { .. })
    ));
}

#[test]
fn test_cli_override_wins_over_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[thresholds]\nmem_warning = 60\n");

    let mut config = Config::load(Some(&path)).unwrap();
    config.apply_override("mem_warning=65").unwrap();
    config.validate().unwrap();
    assert_eq!(config.thresholds.mem_warning, 65.0);
}
