use anyhow::{Context, Result};
use clap::ArgMatches;
use log::debug;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use crate::core::health::{
    Category, CategoryFilter, CollectorConfig, DashboardRunner, MetricCollector,
};
use crate::error::SysdashError;
use crate::platform::SysinfoSource;
use crate::ui::{OutputFormat, ReportRenderer};

use super::config;

/// Take one snapshot of the host, print the report, and return the
/// health-check exit code.
pub fn execute(matches: &ArgMatches) -> Result<i32> {
    // Format errors are fatal before any query runs
    let format = match matches.get_one::<String>("format") {
        Some(name) => name.parse::<OutputFormat>()?,
        None => OutputFormat::default(),
    };

    let mut config = config::load(matches)?;
    if let Some(timeout_ms) = matches.get_one::<u64>("timeout-ms") {
        config.collector.timeout_ms = *timeout_ms;
        config.validate().context("Invalid --timeout-ms")?;
    }
    if matches.get_flag("parallel") {
        config.collector.parallel = true;
    }

    let filter = match matches.get_one::<String>("only") {
        Some(raw) => parse_filter(raw)?,
        None => CategoryFilter::all(),
    };

    let collector_config = CollectorConfig {
        filter,
        query_timeout: config.query_timeout(),
        parallel: config.collector.parallel,
    };
    debug!(
        "Collecting with timeout {:?} ({})",
        collector_config.query_timeout,
        if collector_config.parallel { "parallel" } else { "sequential" }
    );

    let collector = MetricCollector::with_config(Arc::new(SysinfoSource::new()), collector_config);
    let renderer = ReportRenderer::with_color(use_color(matches));
    let outcome = DashboardRunner::new(collector)
        .with_renderer(renderer)
        .run(&config.thresholds, format)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(outcome.output.as_bytes())
        .and_then(|_| stdout.flush())
        .context("Failed to write report")?;

    Ok(outcome.exit_code)
}

/// Parse `--only cpu,memory` into a filter
pub fn parse_filter(raw: &str) -> Result<CategoryFilter, SysdashError> {
    let categories = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<Category>()
                .map_err(|details| SysdashError::configuration("only", details))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if categories.is_empty() {
        return Err(SysdashError::configuration(
            "only",
            "expected at least one category",
        ));
    }
    Ok(CategoryFilter::only(&categories))
}

fn use_color(matches: &ArgMatches) -> bool {
    !matches.get_flag("no-color")
        && std::env::var_os("NO_COLOR").is_none()
        && io::stdout().is_terminal()
}
