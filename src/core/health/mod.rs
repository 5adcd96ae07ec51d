//! Host health reporting core.
//!
//! Data flows one way: [`MetricCollector`] samples a [`MetricSource`],
//! [`ThresholdEvaluator`] classifies each metric, [`Report`] groups the
//! assessments, and [`DashboardRunner`] ties the stages together.

pub mod collector;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod source;
pub mod thresholds;

pub use collector::{
    is_loopback, is_pseudo_filesystem, CategoryFilter, CollectorConfig, MetricCollector, Snapshot,
    DEFAULT_QUERY_TIMEOUT,
};
pub use metrics::{
    Category, CpuSample, DiskSample, IdentitySample, InodeSample, InterfaceSample, LoadSample,
    MemorySample, Metric, SwapSample, SystemIdentity, Unit,
};
pub use report::{overall_tier, Report, Section};
pub use runner::{DashboardRunner, RunOutcome};
pub use source::{MetricSource, SourceResult};
pub use thresholds::{
    evaluate, Assessment, StatusTier, Threshold, ThresholdEvaluator, ThresholdRule,
};
