use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Report sections, in the order they are collected and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Identity,
    Cpu,
    Memory,
    Disk,
    Network,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Identity,
        Category::Cpu,
        Category::Memory,
        Category::Disk,
        Category::Network,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Identity => "identity",
            Category::Cpu => "cpu",
            Category::Memory => "memory",
            Category::Disk => "disk",
            Category::Network => "network",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "identity" | "system" => Ok(Category::Identity),
            "cpu" | "load" => Ok(Category::Cpu),
            "memory" | "mem" | "swap" => Ok(Category::Memory),
            "disk" | "disks" => Ok(Category::Disk),
            "network" | "net" => Ok(Category::Network),
            other => Err(format!(
                "unknown category '{}' (expected identity, cpu, memory, disk or network)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Percent,
    Bytes,
    Count,
    Seconds,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Percent => "percent",
            Unit::Bytes => "bytes",
            Unit::Count => "count",
            Unit::Seconds => "seconds",
        }
    }
}

/// A single sampled value. `value` is `None` when the data source could not
/// be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub category: Category,
    pub value: Option<f64>,
    pub unit: Unit,
}

impl Metric {
    /// A NaN or infinite reading is stored as unknown.
    pub fn new(name: impl Into<String>, category: Category, value: f64, unit: Unit) -> Self {
        Self {
            name: name.into(),
            category,
            value: Some(value).filter(|v| v.is_finite()),
            unit,
        }
    }

    pub fn unknown(name: impl Into<String>, category: Category, unit: Unit) -> Self {
        Self {
            name: name.into(),
            category,
            value: None,
            unit,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.value.is_none()
    }

    /// Metric family, e.g. `disk` for `disk:/var`
    pub fn kind(&self) -> &str {
        match self.name.split_once(':') {
            Some((kind, _)) => kind,
            None => &self.name,
        }
    }

    /// Mount point or interface the metric describes, e.g. `/var` for `disk:/var`
    pub fn subject(&self) -> Option<&str> {
        self.name.split_once(':').map(|(_, subject)| subject)
    }
}

/// Host identity. Fields are `None` when the OS does not report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemIdentity {
    pub hostname: Option<String>,
    pub os: Option<String>,
    pub kernel: Option<String>,
    pub architecture: Option<String>,
}

/// Raw identity sample, including uptime
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentitySample {
    pub identity: SystemIdentity,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuSample {
    pub logical_cores: usize,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadSample {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemorySample {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub available_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwapSample {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InodeSample {
    pub total: u64,
    pub free: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskSample {
    pub mount_point: String,
    pub fs_type: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
    /// `None` when the filesystem does not report inode counts
    pub inodes: Option<InodeSample>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceSample {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
}

/// `part / whole` as a percentage rounded to one decimal place.
///
/// The rounded value is the one that gets evaluated, so a reading displayed
/// as `85.0%` classifies the same way as a literal 85.
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
