use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use sysdash::core::config::Thresholds;
use tempfile::TempDir;

/// The binary with every `SYSDASH_*` override removed and the default
/// config location pointed at a directory that holds no config file.
fn sysdash() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sysdash"));
    let keys = Thresholds::KEYS
        .iter()
        .copied()
        .chain(["timeout_ms", "parallel"]);
    for key in keys {
        cmd.env_remove(format!("SYSDASH_{}", key.to_uppercase()));
    }
    cmd.env_remove("SYSDASH_CONFIG");

    let empty = std::env::temp_dir().join("sysdash-cli-test-no-config");
    cmd.env("XDG_CONFIG_HOME", &empty).env("HOME", &empty);
    cmd
}

fn config_file(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run sysdash binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_unsupported_format_exits_3() {
    let output = run(sysdash().args(["--format", "xml"]));
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    assert!(stderr(&output).contains("Unsupported output format 'xml'"));
}

#[test]
fn test_missing_config_exits_3() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");
    let output = run(sysdash().arg("--config").arg(&missing));
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("not found"));
}

#[test]
fn test_invalid_threshold_exits_3_and_names_key() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "[thresholds]\ncpu_warning = -5\n");
    let output = run(sysdash().arg("--config").arg(&path));
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("cpu_warning"));
}

#[test]
fn test_unknown_category_exits_3() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "");
    let output = run(sysdash().arg("--config").arg(&path).args(["--only", "gpu"]));
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("only"));
}

#[test]
fn test_bad_argument_exits_3() {
    let output = run(sysdash().arg("--no-such-flag"));
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_help_exits_0() {
    let output = run(sysdash().arg("--help"));
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("--format"));
}

#[test]
fn test_thresholds_layers_file_env_and_set() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "[thresholds]\ncpu_warning = 40\nmem_warning = 60\n");

    let output = run(sysdash()
        .arg("thresholds")
        .arg("--config")
        .arg(&path)
        .env("SYSDASH_MEM_WARNING", "65")
        .args(["--set", "disk_warning=75"]));
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let text = stdout(&output);
    let lines: Vec<_> = text.lines().collect();
    assert!(lines.contains(&"cpu_warning=40"));
    assert!(lines.contains(&"mem_warning=65"));
    assert!(lines.contains(&"disk_warning=75"));
    assert!(lines.contains(&"disk_critical=90"));
    assert!(lines.contains(&"timeout_ms=3000"));
    assert!(lines.contains(&"parallel=false"));
}

#[test]
fn test_bad_set_exits_3() {
    let dir = TempDir::new().unwrap();
    let path = config_file(&dir, "");
    let output = run(sysdash()
        .arg("thresholds")
        .arg("--config")
        .arg(Path::new(&path))
        .args(["--set", "cpu_critical=soon"]));
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("cpu_critical"));
}

#[test]
fn test_completions() {
    let output = run(sysdash().args(["completions", "bash"]));
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("sysdash"));

    let output = run(sysdash().args(["completions", "tcsh"]));
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_version() {
    let output = run(sysdash().arg("version"));
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_defaults_when_no_config_anywhere() {
    let output = run(sysdash().arg("thresholds"));
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let expected: Vec<String> = Thresholds::default()
        .entries()
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    let text = stdout(&output);
    let lines: Vec<_> = text.lines().collect();
    for line in &expected {
        assert!(lines.contains(&line.as_str()), "missing {}", line);
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_default_config_dir_is_read() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("sysdash")).unwrap();
    fs::write(
        dir.path().join("sysdash").join("config.toml"),
        "[thresholds]\nload_warning_multiplier = 1.5\n",
    )
    .unwrap();

    let output = run(sysdash().arg("thresholds").env("XDG_CONFIG_HOME", dir.path()));
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).lines().any(|l| l == "load_warning_multiplier=1.5"));
}
