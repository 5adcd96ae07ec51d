//! Layered configuration: defaults, TOML file, `SYSDASH_*` environment
//! variables, then command-line overrides.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SysdashError};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SYSDASH_CONFIG";

const ENV_PREFIX: &str = "SYSDASH_";

/// Threshold levels used to classify metrics.
///
/// Percent thresholds apply to usage percentages. Load thresholds are
/// multiples of the logical core count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub cpu_warning: f64,
    pub cpu_critical: f64,
    pub mem_warning: f64,
    pub mem_critical: f64,
    pub disk_warning: f64,
    pub disk_critical: f64,
    pub load_warning_multiplier: f64,
    pub load_critical_multiplier: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_warning: 50.0,
            cpu_critical: 80.0,
            mem_warning: 70.0,
            mem_critical: 85.0,
            disk_warning: 80.0,
            disk_critical: 90.0,
            load_warning_multiplier: 1.0,
            load_critical_multiplier: 2.0,
        }
    }
}

impl Thresholds {
    pub const KEYS: [&'static str; 8] = [
        "cpu_warning",
        "cpu_critical",
        "mem_warning",
        "mem_critical",
        "disk_warning",
        "disk_critical",
        "load_warning_multiplier",
        "load_critical_multiplier",
    ];

    pub fn get(&self, key: &str) -> Option<f64> {
        let value = match key {
            "cpu_warning" => self.cpu_warning,
            "cpu_critical" => self.cpu_critical,
            "mem_warning" => self.mem_warning,
            "mem_critical" => self.mem_critical,
            "disk_warning" => self.disk_warning,
            "disk_critical" => self.disk_critical,
            "load_warning_multiplier" => self.load_warning_multiplier,
            "load_critical_multiplier" => self.load_critical_multiplier,
            _ => return None,
        };
        Some(value)
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut f64> {
        match key {
            "cpu_warning" => Some(&mut self.cpu_warning),
            "cpu_critical" => Some(&mut self.cpu_critical),
            "mem_warning" => Some(&mut self.mem_warning),
            "mem_critical" => Some(&mut self.mem_critical),
            "disk_warning" => Some(&mut self.disk_warning),
            "disk_critical" => Some(&mut self.disk_critical),
            "load_warning_multiplier" => Some(&mut self.load_warning_multiplier),
            "load_critical_multiplier" => Some(&mut self.load_critical_multiplier),
            _ => None,
        }
    }

    /// Set a threshold by key
    pub fn set(&mut self, key: &str, value: f64) -> Result<()> {
        let slot = self.slot_mut(key).ok_or_else(|| {
            SysdashError::configuration(
                key,
                format!("unknown threshold (expected one of: {})", Self::KEYS.join(", ")),
            )
        })?;
        *slot = value;
        Ok(())
    }

    /// All thresholds in declaration order
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in self.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(SysdashError::configuration(
                    key,
                    format!("must be a non-negative number, got {}", value),
                ));
            }
        }

        for (warning, critical) in [
            ("cpu_warning", "cpu_critical"),
            ("mem_warning", "mem_critical"),
            ("disk_warning", "disk_critical"),
            ("load_warning_multiplier", "load_critical_multiplier"),
        ] {
            let (w, c) = (self.get(warning), self.get(critical));
            if let (Some(w), Some(c)) = (w, c) {
                if w > c {
                    return Err(SysdashError::configuration(
                        warning,
                        format!("{} ({}) must not exceed {} ({})", warning, w, critical, c),
                    ));
                }
            }
        }

        if self.load_warning_multiplier == 0.0 {
            return Err(SysdashError::configuration(
                "load_warning_multiplier",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// How the collector queries the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorSettings {
    /// Per-query timeout in milliseconds
    pub timeout_ms: u64,
    /// Run independent OS queries concurrently
    pub parallel: bool,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 3000,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub thresholds: Thresholds,
    pub collector: CollectorSettings,
}

impl Config {
    /// `<config_dir>/sysdash/config.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sysdash").join("config.toml"))
    }

    /// Load from an explicit path, `$SYSDASH_CONFIG`, or the default path,
    /// then apply environment overrides and validate.
    ///
    /// A missing file at the default path is not an error; a missing explicit
    /// path is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env_var(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(SysdashError::MissingConfig { path });
                }
                Self::from_file(&path)?
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides_from(env_var)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        log::debug!("Loading configuration from {}", path.display());
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|error| {
            SysdashError::configuration(offending_key(raw, &error), error.message().to_string())
        })
    }

    /// Apply `SYSDASH_<KEY>` overrides using `lookup` to read variables
    pub fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let keys = Thresholds::KEYS
            .iter()
            .copied()
            .chain(["timeout_ms", "parallel"]);

        for key in keys {
            let name = format!("{}{}", ENV_PREFIX, key.to_uppercase());
            if let Some(raw) = lookup(&name) {
                self.set(key, &raw).map_err(|error| match error {
                    SysdashError::Configuration { details, .. } => {
                        SysdashError::configuration(name.clone(), details)
                    }
                    other => other,
                })?;
            }
        }
        Ok(())
    }

    /// Apply a `key=value` override as given on the command line
    pub fn apply_override(&mut self, assignment: &str) -> Result<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            SysdashError::configuration(assignment.trim(), "expected KEY=VALUE")
        })?;
        self.set(key.trim(), value.trim())
    }

    /// Set any recognized key from its textual value
    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        match key {
            "timeout_ms" => {
                self.collector.timeout_ms = raw.trim().parse::<u64>().map_err(|error| {
                    SysdashError::configuration(key, format!("{:?}: {}", raw, error))
                })?;
            }
            "parallel" => {
                self.collector.parallel = raw.trim().parse::<bool>().map_err(|error| {
                    SysdashError::configuration(key, format!("{:?}: {}", raw, error))
                })?;
            }
            _ => {
                let value = raw.trim().parse::<f64>().map_err(|error| {
                    SysdashError::configuration(key, format!("{:?}: {}", raw, error))
                })?;
                self.thresholds.set(key, value)?;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if self.collector.timeout_ms == 0 {
            return Err(SysdashError::configuration(
                "timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.collector.timeout_ms)
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

/// Best-effort key name for a TOML error: the text left of `=` on the line
/// the error points at.
fn offending_key(raw: &str, error: &toml::de::Error) -> String {
    if let Some(rest) = error.message().strip_prefix("unknown field `") {
        if let Some((key, _)) = rest.split_once('`') {
            return key.to_string();
        }
    }
    if let Some(span) = error.span() {
        let start = raw[..span.start.min(raw.len())]
            .rfind('\n')
            .map_or(0, |idx| idx + 1);
        let line = raw[start..].lines().next().unwrap_or_default();
        if let Some((key, _)) = line.split_once('=') {
            return key.trim().to_string();
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    "config".to_string()
}
