//! Report rendering.
//!
//! Rendering is a pure function of the [`Report`] and the format: the same
//! input always produces byte-identical output.

use chrono::SecondsFormat;
use colored::*;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::core::health::{Assessment, Category, Report, StatusTier, Unit};
use crate::error::{Result, SysdashError};

use super::formatters::{format_count, format_value, metric_label};

const RULE_WIDTH: usize = 80;
const LABEL_WIDTH: usize = 24;
const VALUE_WIDTH: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Grouped sections with tier annotations
    #[default]
    Human,
    /// One `key=value` record per line
    Structured,
    Json,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 3] = ["human", "structured", "json"];
}

impl FromStr for OutputFormat {
    type Err = SysdashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "structured" | "kv" => Ok(OutputFormat::Structured),
            "json" => Ok(OutputFormat::Json),
            _ => Err(SysdashError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    color: bool,
}

impl ReportRenderer {
    /// Plain renderer, no ANSI escapes
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    pub fn render(&self, report: &Report, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Human => Ok(self.render_human(report)),
            OutputFormat::Structured => Ok(render_structured(report)),
            OutputFormat::Json => render_json(report),
        }
    }

    fn render_human(&self, report: &Report) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.paint_title("SYSTEM HEALTH REPORT"));
        let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
        let _ = writeln!(
            out,
            "  {:<10} {}",
            "Snapshot:",
            report.taken_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(out, "  {:<10} {}", "Overall:", self.paint_tier(report.overall));

        let unknown = report.count(StatusTier::Unknown);
        if unknown > 0 {
            let _ = writeln!(out, "  {:<10} {} metric(s) could not be read", "Unknown:", unknown);
        }

        for section in &report.sections {
            out.push('\n');
            self.section_header(&mut out, section.category);

            if section.category == Category::Identity {
                let identity = &report.identity;
                for (label, value) in [
                    ("Hostname", &identity.hostname),
                    ("OS", &identity.os),
                    ("Kernel", &identity.kernel),
                    ("Architecture", &identity.architecture),
                ] {
                    let value = value.as_deref().unwrap_or("unknown");
                    let _ = writeln!(out, "  {:<LABEL_WIDTH$} {}", label, value);
                }
            } else if section.assessments.is_empty() {
                let _ = writeln!(out, "  (no data)");
            }

            for assessment in &section.assessments {
                self.assessment_line(&mut out, assessment);
            }
        }

        out
    }

    fn section_header(&self, out: &mut String, category: Category) {
        let title = category.as_str().to_uppercase();
        let underline = "-".repeat(title.len());
        if self.color {
            let _ = writeln!(out, "{}", title.bold().green());
        } else {
            let _ = writeln!(out, "{}", title);
        }
        let _ = writeln!(out, "{}", underline);
    }

    fn assessment_line(&self, out: &mut String, assessment: &Assessment) {
        let label = metric_label(&assessment.metric);
        let value = format_value(&assessment.metric);

        // Informational metrics carry no tier tag unless they could not be read
        let show_tier = assessment.threshold.is_some() || assessment.tier == StatusTier::Unknown;
        let line = if show_tier {
            format!(
                "  {:<LABEL_WIDTH$} {:<VALUE_WIDTH$} [{}]",
                label,
                value,
                self.paint_tier(assessment.tier)
            )
        } else {
            format!("  {:<LABEL_WIDTH$} {}", label, value)
        };
        let _ = writeln!(out, "{}", line.trim_end());
    }

    fn paint_title(&self, title: &str) -> String {
        if self.color {
            title.bold().bright_cyan().to_string()
        } else {
            title.to_string()
        }
    }

    fn paint_tier(&self, tier: StatusTier) -> String {
        if !self.color {
            return tier.to_string();
        }
        match tier {
            StatusTier::Ok => tier.as_str().green().to_string(),
            StatusTier::Warning => tier.as_str().yellow().bold().to_string(),
            StatusTier::Critical => tier.as_str().red().bold().to_string(),
            StatusTier::Unknown => tier.as_str().dimmed().to_string(),
        }
    }
}

/// Render with the default (uncolored) renderer
pub fn render(report: &Report, format: OutputFormat) -> Result<String> {
    ReportRenderer::new().render(report, format)
}

fn render_structured(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "generated_at={}",
        report.taken_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "overall={}", report.overall);

    if report.section(Category::Identity).is_some() {
        let identity = &report.identity;
        for (key, value) in [
            ("hostname", &identity.hostname),
            ("os", &identity.os),
            ("kernel", &identity.kernel),
            ("architecture", &identity.architecture),
        ] {
            let _ = writeln!(out, "{}={}", key, quote(value.as_deref().unwrap_or("unknown")));
        }
    }

    for assessment in report.assessments() {
        let metric = &assessment.metric;
        let value = match metric.value {
            None => "unknown".to_string(),
            Some(v) => match metric.unit {
                Unit::Percent => format!("{:.1}", v),
                Unit::Bytes | Unit::Seconds => format!("{:.0}", v),
                Unit::Count => format_count(v),
            },
        };

        let mut line = format!(
            "metric={} category={} value={} unit={} tier={}",
            quote(&metric.name),
            metric.category,
            value,
            metric.unit.as_str(),
            assessment.tier
        );
        if let Some(threshold) = &assessment.threshold {
            let _ = write!(
                line,
                " warning={} critical={}",
                threshold.warning_level, threshold.critical_level
            );
        }
        let _ = writeln!(out, "{}", line);
    }

    out
}

fn render_json(report: &Report) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)
        .map_err(|e| SysdashError::render(format!("failed to encode report as JSON: {}", e)))?;
    json.push('\n');
    Ok(json)
}

/// Quote a structured value if it would not survive whitespace splitting
fn quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
