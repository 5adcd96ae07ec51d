use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sysdash::core::config::Thresholds;
use sysdash::core::health::*;
use sysdash::error::CollectionError;
use sysdash::ui::OutputFormat;

const GIB: u64 = 1024 * 1024 * 1024;

/// Canned host: 4 cores, busy memory, one full disk, a stuck network query
struct StressedHost;

impl MetricSource for StressedHost {
    fn identity(&self) -> SourceResult<IdentitySample> {
        Ok(IdentitySample {
            identity: SystemIdentity {
                hostname: Some("db01".to_string()),
                os: Some("Debian 12".to_string()),
                kernel: Some("6.1.0".to_string()),
                architecture: Some("aarch64".to_string()),
            },
            uptime_secs: 86_400,
        })
    }

    fn cpu(&self) -> SourceResult<CpuSample> {
        Ok(CpuSample {
            logical_cores: 4,
            usage_percent: 12.5,
        })
    }

    fn load(&self) -> SourceResult<LoadSample> {
        Ok(LoadSample {
            one: 4.0,
            five: 2.0,
            fifteen: 1.0,
        })
    }

    fn memory(&self) -> SourceResult<MemorySample> {
        Ok(MemorySample {
            total_bytes: 16 * GIB,
            used_bytes: 12 * GIB,
            free_bytes: 4 * GIB,
            available_bytes: 4 * GIB,
        })
    }

    fn swap(&self) -> SourceResult<SwapSample> {
        Err(CollectionError::unavailable("swap", "no swap configured"))
    }

    fn disks(&self) -> SourceResult<Vec<DiskSample>> {
        Ok(vec![
            DiskSample {
                mount_point: "/srv".to_string(),
                fs_type: "xfs".to_string(),
                total_bytes: 100 * GIB,
                available_bytes: 5 * GIB,
                inodes: Some(InodeSample {
                    total: 1_000,
                    free: 900,
                }),
            },
            DiskSample {
                mount_point: "/run".to_string(),
                fs_type: "tmpfs".to_string(),
                total_bytes: GIB,
                available_bytes: GIB,
                inodes: None,
            },
        ])
    }

    fn interfaces(&self) -> SourceResult<Vec<InterfaceSample>> {
        thread::sleep(Duration::from_millis(500));
        Ok(Vec::new())
    }
}

fn collector() -> MetricCollector {
    MetricCollector::with_config(
        Arc::new(StressedHost),
        CollectorConfig {
            filter: CategoryFilter::all(),
            query_timeout: Duration::from_millis(100),
            parallel: true,
        },
    )
}

#[test]
fn test_full_pass_classifies_and_degrades() {
    let outcome = DashboardRunner::new(collector())
        .run(&Thresholds::default(), OutputFormat::Structured)
        .unwrap();
    let report = &outcome.report;

    assert_eq!(report.find("disk:/srv").unwrap().tier, StatusTier::Critical);
    assert_eq!(report.find("inode:/srv").unwrap().tier, StatusTier::Ok);
    assert_eq!(report.find("mem_usage").unwrap().tier, StatusTier::Warning);
    // 4.0 load on 4 cores is exactly the warning level
    assert_eq!(report.find("load_1m").unwrap().tier, StatusTier::Warning);
    assert_eq!(report.find("swap_usage").unwrap().tier, StatusTier::Unknown);

    // Pseudo filesystems never show up
    assert!(report.find("disk:/run").is_none());

    // The stuck interface query becomes a single unknown metric
    let network = report.find("network").unwrap();
    assert_eq!(network.tier, StatusTier::Unknown);

    assert_eq!(report.overall, StatusTier::Critical);
    assert_eq!(outcome.exit_code, 2);
    assert!(outcome.output.contains("overall=CRITICAL"));
    assert!(outcome.output.contains("hostname=db01"));
}

#[test]
fn test_raised_thresholds_change_the_outcome() {
    let mut thresholds = Thresholds::default();
    thresholds.disk_warning = 96.0;
    thresholds.disk_critical = 99.0;
    thresholds.mem_warning = 80.0;
    thresholds.load_warning_multiplier = 1.5;
    thresholds.load_critical_multiplier = 3.0;

    let report = DashboardRunner::new(collector()).report(&thresholds).unwrap();
    assert_eq!(report.overall, StatusTier::Ok);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_only_filter_skips_other_queries() {
    let collector = MetricCollector::with_config(
        Arc::new(StressedHost),
        CollectorConfig {
            filter: CategoryFilter::only(&[Category::Memory]),
            ..CollectorConfig::default()
        },
    );

    let report = DashboardRunner::new(collector)
        .report(&Thresholds::default())
        .unwrap();
    assert_eq!(report.sections.len(), 1);
    assert!(report.find("disk:/srv").is_none());
    assert_eq!(report.overall, StatusTier::Warning);
}
