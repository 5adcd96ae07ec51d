// UI and formatting module

pub mod formatters;
pub mod report_renderer;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_bytes, format_count, format_uptime, format_value, metric_label};
pub use report_renderer::{render, OutputFormat, ReportRenderer};
