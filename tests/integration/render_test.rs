use chrono::{TimeZone, Utc};

use sysdash::core::health::*;
use sysdash::ui::{render, OutputFormat, ReportRenderer};

fn report() -> Report {
    let metrics = vec![
        Metric::new("cpu_usage", Category::Cpu, 81.0, Unit::Percent),
        Metric::new("net_rx:wlan0", Category::Network, 2048.0, Unit::Bytes),
        Metric::new("net_rx:eth0", Category::Network, 1024.0, Unit::Bytes),
        Metric::unknown("swap_usage", Category::Memory, Unit::Percent),
    ];
    let thresholds = sysdash::Thresholds::default();
    let evaluator = ThresholdEvaluator::new(&thresholds, Some(2));

    Report::build(
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        SystemIdentity {
            hostname: Some("edge".to_string()),
            ..SystemIdentity::default()
        },
        evaluator.evaluate_all(&metrics),
        &CategoryFilter::all(),
    )
}

#[test]
fn test_human_report_layout() {
    let text = render(&report(), OutputFormat::Human).unwrap();

    assert!(text.starts_with("SYSTEM HEALTH REPORT\n"));
    assert!(text.contains("Overall:   CRITICAL"));
    assert!(text.contains("Unknown:   1 metric(s) could not be read"));
    assert!(text.contains("Kernel                   unknown"));
    assert!(text.find("eth0 received").unwrap() < text.find("wlan0 received").unwrap());
    // Disk section exists even when empty
    assert!(text.contains("DISK\n----\n  (no data)"));
}

#[test]
fn test_color_only_when_enabled() {
    colored::control::set_override(true);
    let plain = ReportRenderer::with_color(false)
        .render(&report(), OutputFormat::Human)
        .unwrap();
    let painted = ReportRenderer::with_color(true)
        .render(&report(), OutputFormat::Human)
        .unwrap();
    colored::control::unset_override();

    assert!(!plain.contains('\u{1b}'));
    assert!(painted.contains('\u{1b}'));
}

#[test]
fn test_structured_and_json_agree_on_overall() {
    let structured = render(&report(), OutputFormat::Structured).unwrap();
    assert!(structured.lines().any(|l| l == "overall=CRITICAL"));
    assert!(structured.lines().any(|l| l == "generated_at=2026-01-02T03:04:05Z"));

    let json: serde_json::Value =
        serde_json::from_str(&render(&report(), OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["overall"], "CRITICAL");
    assert_eq!(json["identity"]["hostname"], "edge");
}
