//! Runs one dashboard pass: collect, evaluate, render.

use log::info;

use crate::core::config::Thresholds;
use crate::error::Result;
use crate::ui::report_renderer::{OutputFormat, ReportRenderer};

use super::collector::MetricCollector;
use super::report::Report;

/// Result of one pass
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: Report,
    pub output: String,
    pub exit_code: i32,
}

/// Orchestrates a single snapshot. No retries: a failed query shows up as
/// unknown metrics in the report.
pub struct DashboardRunner {
    collector: MetricCollector,
    renderer: ReportRenderer,
}

impl DashboardRunner {
    pub fn new(collector: MetricCollector) -> Self {
        Self {
            collector,
            renderer: ReportRenderer::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: ReportRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Collect and evaluate without rendering
    pub fn report(&self, thresholds: &Thresholds) -> Result<Report> {
        let snapshot = self.collector.collect()?;
        if !snapshot.failures.is_empty() {
            info!(
                "{} quer{} degraded to unknown",
                snapshot.failures.len(),
                if snapshot.failures.len() == 1 { "y" } else { "ies" }
            );
        }
        Ok(Report::from_snapshot(
            &snapshot,
            thresholds,
            &self.collector.config().filter,
        ))
    }

    pub fn run(&self, thresholds: &Thresholds, format: OutputFormat) -> Result<RunOutcome> {
        let report = self.report(thresholds)?;
        let output = self.renderer.render(&report, format)?;
        let exit_code = report.exit_code();
        info!("Overall status {} (exit code {})", report.overall, exit_code);

        Ok(RunOutcome {
            report,
            output,
            exit_code,
        })
    }
}
