//! Threshold evaluation.
//!
//! Classifies each metric into a [`StatusTier`] using the configured
//! [`Thresholds`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::config::Thresholds;
use crate::error::{EXIT_CRITICAL, EXIT_OK, EXIT_WARNING};

use super::metrics::Metric;

/// Severity of a metric or a whole report.
///
/// Declaration order is display order: `Unknown` sorts below `Ok`. Code that
/// computes the worst tier must skip `Unknown` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusTier {
    Unknown,
    Ok,
    Warning,
    Critical,
}

impl StatusTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTier::Unknown => "UNKNOWN",
            StatusTier::Ok => "OK",
            StatusTier::Warning => "WARNING",
            StatusTier::Critical => "CRITICAL",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != StatusTier::Unknown
    }

    /// Health-check exit code for a report whose overall tier is `self`
    pub fn exit_code(&self) -> i32 {
        match self {
            StatusTier::Unknown | StatusTier::Ok => EXIT_OK,
            StatusTier::Warning => EXIT_WARNING,
            StatusTier::Critical => EXIT_CRITICAL,
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Warning and critical levels for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub metric_name: String,
    pub warning_level: f64,
    pub critical_level: f64,
}

impl Threshold {
    pub fn new(metric_name: impl Into<String>, warning_level: f64, critical_level: f64) -> Self {
        Self {
            metric_name: metric_name.into(),
            warning_level,
            critical_level,
        }
    }

    /// Levels are inclusive: a value equal to a level takes the more severe tier.
    pub fn classify(&self, value: f64) -> StatusTier {
        if value >= self.critical_level {
            StatusTier::Critical
        } else if value >= self.warning_level {
            StatusTier::Warning
        } else {
            StatusTier::Ok
        }
    }
}

/// A metric paired with its tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub metric: Metric,
    pub tier: StatusTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Threshold>,
}

/// Classify one metric.
///
/// Unknown and non-finite values are `Unknown`. Known values without a threshold are
/// informational and always `Ok`.
pub fn evaluate(metric: &Metric, threshold: Option<&Threshold>) -> Assessment {
    let tier = match (metric.value, threshold) {
        (None, _) => StatusTier::Unknown,
        (Some(value), _) if !value.is_finite() => StatusTier::Unknown,
        (Some(value), Some(threshold)) => threshold.classify(value),
        (Some(_), None) => StatusTier::Ok,
    };

    Assessment {
        metric: metric.clone(),
        tier,
        threshold: threshold.cloned(),
    }
}

/// How a metric maps onto the configured thresholds
#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdRule {
    /// No threshold applies; the metric is reported for information
    Informational,
    Bounded(Threshold),
    /// A threshold applies but cannot be computed (load without a core count)
    Unresolved,
}

/// Resolves thresholds per metric for one snapshot
#[derive(Debug, Clone)]
pub struct ThresholdEvaluator<'a> {
    thresholds: &'a Thresholds,
    cpu_cores: Option<usize>,
}

impl<'a> ThresholdEvaluator<'a> {
    pub fn new(thresholds: &'a Thresholds, cpu_cores: Option<usize>) -> Self {
        Self {
            thresholds,
            cpu_cores,
        }
    }

    pub fn rule_for(&self, metric: &Metric) -> ThresholdRule {
        let t = self.thresholds;
        let bounded = |warning: f64, critical: f64| {
            ThresholdRule::Bounded(Threshold::new(&metric.name, warning, critical))
        };

        match metric.kind() {
            "cpu_usage" => bounded(t.cpu_warning, t.cpu_critical),
            "mem_usage" => bounded(t.mem_warning, t.mem_critical),
            "disk" | "inode" => bounded(t.disk_warning, t.disk_critical),
            "load_1m" | "load_5m" | "load_15m" => match self.cpu_cores {
                Some(cores) if cores > 0 => {
                    let cores = cores as f64;
                    bounded(
                        t.load_warning_multiplier * cores,
                        t.load_critical_multiplier * cores,
                    )
                }
                _ => ThresholdRule::Unresolved,
            },
            _ => ThresholdRule::Informational,
        }
    }

    pub fn evaluate(&self, metric: &Metric) -> Assessment {
        match self.rule_for(metric) {
            ThresholdRule::Informational => evaluate(metric, None),
            ThresholdRule::Bounded(threshold) => evaluate(metric, Some(&threshold)),
            ThresholdRule::Unresolved => Assessment {
                metric: metric.clone(),
                tier: StatusTier::Unknown,
                threshold: None,
            },
        }
    }

    pub fn evaluate_all(&self, metrics: &[Metric]) -> Vec<Assessment> {
        metrics.iter().map(|metric| self.evaluate(metric)).collect()
    }
}
