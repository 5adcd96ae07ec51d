// Core business logic module

pub mod config;
pub mod health;

// Re-export commonly used items
pub use config::{CollectorSettings, Config, Thresholds};
pub use health::{DashboardRunner, MetricCollector, Report, StatusTier};
