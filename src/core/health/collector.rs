use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::error::{CollectionError, Result, SysdashError};

use super::metrics::*;
use super::source::{MetricSource, SourceResult};

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(3000);

/// Filesystem types that never represent real storage
const PSEUDO_FILESYSTEMS: &[&str] = &[
    "autofs",
    "binfmt_misc",
    "bpf",
    "cgroup",
    "cgroup2",
    "configfs",
    "debugfs",
    "devpts",
    "devtmpfs",
    "efivarfs",
    "fusectl",
    "hugetlbfs",
    "mqueue",
    "nsfs",
    "proc",
    "pstore",
    "ramfs",
    "rpc_pipefs",
    "securityfs",
    "squashfs",
    "sysfs",
    "tmpfs",
    "tracefs",
];

pub fn is_pseudo_filesystem(fs_type: &str) -> bool {
    PSEUDO_FILESYSTEMS.contains(&fs_type.to_lowercase().as_str())
}

/// `lo`, `lo0`, `lo1`, ...
pub fn is_loopback(interface: &str) -> bool {
    interface
        .strip_prefix("lo")
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}

/// Which report categories to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    pub identity: bool,
    pub cpu: bool,
    pub memory: bool,
    pub disk: bool,
    pub network: bool,
}

impl CategoryFilter {
    pub fn all() -> Self {
        Self {
            identity: true,
            cpu: true,
            memory: true,
            disk: true,
            network: true,
        }
    }

    /// Only the listed categories. An empty list means all of them.
    pub fn only(categories: &[Category]) -> Self {
        if categories.is_empty() {
            return Self::all();
        }
        Self {
            identity: categories.contains(&Category::Identity),
            cpu: categories.contains(&Category::Cpu),
            memory: categories.contains(&Category::Memory),
            disk: categories.contains(&Category::Disk),
            network: categories.contains(&Category::Network),
        }
    }

    pub fn includes(&self, category: Category) -> bool {
        match category {
            Category::Identity => self.identity,
            Category::Cpu => self.cpu,
            Category::Memory => self.memory,
            Category::Disk => self.disk,
            Category::Network => self.network,
        }
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// Configuration for metrics collection
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub filter: CategoryFilter,
    pub query_timeout: Duration,
    pub parallel: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            filter: CategoryFilter::all(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            parallel: false,
        }
    }
}

/// One point-in-time collection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub identity: SystemIdentity,
    pub metrics: Vec<Metric>,
    /// Queries that failed and were degraded to unknown metrics
    pub failures: Vec<CollectionError>,
}

impl Snapshot {
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn cpu_cores(&self) -> Option<usize> {
        self.metric("cpu_cores")
            .and_then(|m| m.value)
            .map(|cores| cores as usize)
    }
}

/// Collects a [`Snapshot`] from a [`MetricSource`].
///
/// Every query runs on a blocking thread under `query_timeout`. A query that
/// fails or times out turns into unknown metrics; it never aborts the pass.
pub struct MetricCollector {
    source: Arc<dyn MetricSource>,
    config: CollectorConfig,
}

impl MetricCollector {
    pub fn new(source: Arc<dyn MetricSource>) -> Self {
        Self::with_config(source, CollectorConfig::default())
    }

    pub fn with_config(source: Arc<dyn MetricSource>, config: CollectorConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Collect all configured categories.
    ///
    /// Only fails if the runtime hosting the queries cannot be started.
    pub fn collect(&self) -> Result<Snapshot> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .thread_name("sysdash-query")
            .build()
            .map_err(|e| SysdashError::runtime(format!("failed to start collector: {}", e)))?;

        let snapshot = runtime.block_on(self.collect_all());

        // A timed-out query may still be blocked in the OS; don't wait for it.
        runtime.shutdown_background();
        Ok(snapshot)
    }

    async fn collect_all(&self) -> Snapshot {
        let filter = self.config.filter;
        let taken_at = Utc::now();

        let identity = self.query(filter.identity, "identity", |s| s.identity());
        let cpu = self.query(filter.cpu, "cpu", |s| s.cpu());
        let load = self.query(filter.cpu, "load", |s| s.load());
        let memory = self.query(filter.memory, "memory", |s| s.memory());
        let swap = self.query(filter.memory, "swap", |s| s.swap());
        let disks = self.query(filter.disk, "disks", |s| s.disks());
        let interfaces = self.query(filter.network, "network", |s| s.interfaces());

        let (identity, cpu, load, memory, swap, disks, interfaces) = if self.config.parallel {
            tokio::join!(identity, cpu, load, memory, swap, disks, interfaces)
        } else {
            (
                identity.await,
                cpu.await,
                load.await,
                memory.await,
                swap.await,
                disks.await,
                interfaces.await,
            )
        };

        let mut builder = SnapshotBuilder::default();
        if let Some(result) = identity {
            builder.add_identity(result);
        }
        if let Some(result) = cpu {
            builder.add_cpu(result);
        }
        if let Some(result) = load {
            builder.add_load(result);
        }
        if let Some(result) = memory {
            builder.add_memory(result);
        }
        if let Some(result) = swap {
            builder.add_swap(result);
        }
        if let Some(result) = disks {
            builder.add_disks(result);
        }
        if let Some(result) = interfaces {
            builder.add_interfaces(result);
        }

        builder.finish(taken_at)
    }

    async fn query<T, F>(
        &self,
        enabled: bool,
        name: &'static str,
        probe: F,
    ) -> Option<SourceResult<T>>
    where
        T: Send + 'static,
        F: FnOnce(&dyn MetricSource) -> SourceResult<T> + Send + 'static,
    {
        if !enabled {
            return None;
        }

        let source = Arc::clone(&self.source);
        let timeout = self.config.query_timeout;
        let task = tokio::task::spawn_blocking(move || probe(source.as_ref()));

        let result = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(CollectionError::failed(name, join_error.to_string())),
            Err(_) => Err(CollectionError::TimedOut {
                query: name,
                after: timeout,
            }),
        };
        debug!("Query '{}' finished (ok: {})", name, result.is_ok());
        Some(result)
    }
}

#[derive(Default)]
struct SnapshotBuilder {
    identity: SystemIdentity,
    metrics: Vec<Metric>,
    failures: Vec<CollectionError>,
}

impl SnapshotBuilder {
    fn fail(&mut self, error: CollectionError) {
        warn!("Metric collection degraded: {}", error);
        self.failures.push(error);
    }

    fn unknown(&mut self, names: &[&str], category: Category, unit: Unit) {
        for name in names {
            self.metrics.push(Metric::unknown(*name, category, unit));
        }
    }

    fn add_identity(&mut self, result: SourceResult<IdentitySample>) {
        match result {
            Ok(sample) => {
                self.identity = sample.identity;
                self.metrics.push(Metric::new(
                    "uptime",
                    Category::Identity,
                    sample.uptime_secs as f64,
                    Unit::Seconds,
                ));
            }
            Err(e) => {
                self.fail(e);
                self.unknown(&["uptime"], Category::Identity, Unit::Seconds);
            }
        }
    }

    fn add_cpu(&mut self, result: SourceResult<CpuSample>) {
        match result {
            Ok(sample) => {
                if sample.logical_cores > 0 {
                    self.metrics.push(Metric::new(
                        "cpu_cores",
                        Category::Cpu,
                        sample.logical_cores as f64,
                        Unit::Count,
                    ));
                } else {
                    self.unknown(&["cpu_cores"], Category::Cpu, Unit::Count);
                }
                self.metrics.push(Metric::new(
                    "cpu_usage",
                    Category::Cpu,
                    round1(sample.usage_percent),
                    Unit::Percent,
                ));
            }
            Err(e) => {
                self.fail(e);
                self.unknown(&["cpu_cores"], Category::Cpu, Unit::Count);
                self.unknown(&["cpu_usage"], Category::Cpu, Unit::Percent);
            }
        }
    }

    fn add_load(&mut self, result: SourceResult<LoadSample>) {
        const NAMES: [&str; 3] = ["load_1m", "load_5m", "load_15m"];
        match result {
            Ok(sample) => {
                for (name, value) in NAMES.iter().zip([sample.one, sample.five, sample.fifteen]) {
                    self.metrics
                        .push(Metric::new(*name, Category::Cpu, round2(value), Unit::Count));
                }
            }
            Err(e) => {
                self.fail(e);
                self.unknown(&NAMES, Category::Cpu, Unit::Count);
            }
        }
    }

    fn add_memory(&mut self, result: SourceResult<MemorySample>) {
        let result = result.and_then(|sample| {
            if sample.total_bytes == 0 {
                Err(CollectionError::unavailable("memory", "total memory reported as zero"))
            } else {
                Ok(sample)
            }
        });

        match result {
            Ok(sample) => {
                for (name, bytes) in [
                    ("mem_total", sample.total_bytes),
                    ("mem_used", sample.used_bytes),
                    ("mem_free", sample.free_bytes),
                    ("mem_available", sample.available_bytes),
                ] {
                    self.metrics
                        .push(Metric::new(name, Category::Memory, bytes as f64, Unit::Bytes));
                }
                self.metrics.push(Metric::new(
                    "mem_usage",
                    Category::Memory,
                    percent(sample.used_bytes, sample.total_bytes),
                    Unit::Percent,
                ));
            }
            Err(e) => {
                self.fail(e);
                self.unknown(
                    &["mem_total", "mem_used", "mem_free", "mem_available"],
                    Category::Memory,
                    Unit::Bytes,
                );
                self.unknown(&["mem_usage"], Category::Memory, Unit::Percent);
            }
        }
    }

    fn add_swap(&mut self, result: SourceResult<SwapSample>) {
        let result = result.and_then(|sample| {
            if sample.total_bytes == 0 {
                Err(CollectionError::unavailable("swap", "no swap configured"))
            } else {
                Ok(sample)
            }
        });

        match result {
            Ok(sample) => {
                self.metrics.push(Metric::new(
                    "swap_total",
                    Category::Memory,
                    sample.total_bytes as f64,
                    Unit::Bytes,
                ));
                self.metrics.push(Metric::new(
                    "swap_used",
                    Category::Memory,
                    sample.used_bytes as f64,
                    Unit::Bytes,
                ));
                self.metrics.push(Metric::new(
                    "swap_usage",
                    Category::Memory,
                    percent(sample.used_bytes, sample.total_bytes),
                    Unit::Percent,
                ));
            }
            Err(e) => {
                self.fail(e);
                self.unknown(&["swap_total", "swap_used"], Category::Memory, Unit::Bytes);
                self.unknown(&["swap_usage"], Category::Memory, Unit::Percent);
            }
        }
    }

    fn add_disks(&mut self, result: SourceResult<Vec<DiskSample>>) {
        let disks = match result {
            Ok(disks) => disks,
            Err(e) => {
                self.fail(e);
                self.unknown(&["disks"], Category::Disk, Unit::Percent);
                return;
            }
        };

        let mut seen = HashSet::new();
        for disk in disks {
            if is_pseudo_filesystem(&disk.fs_type) {
                debug!("Skipping pseudo filesystem {} ({})", disk.mount_point, disk.fs_type);
                continue;
            }
            if disk.total_bytes == 0 {
                debug!("Skipping zero-sized filesystem {}", disk.mount_point);
                continue;
            }
            if !seen.insert(disk.mount_point.clone()) {
                continue;
            }

            let mount = &disk.mount_point;
            let used = disk.total_bytes.saturating_sub(disk.available_bytes);

            self.metrics.push(Metric::new(
                format!("disk:{}", mount),
                Category::Disk,
                percent(used, disk.total_bytes),
                Unit::Percent,
            ));

            let inode_name = format!("inode:{}", mount);
            match disk.inodes {
                Some(inodes) if inodes.total > 0 => self.metrics.push(Metric::new(
                    inode_name,
                    Category::Disk,
                    percent(inodes.total.saturating_sub(inodes.free), inodes.total),
                    Unit::Percent,
                )),
                _ => {
                    debug!("No inode counts for {}", mount);
                    self.metrics
                        .push(Metric::unknown(inode_name, Category::Disk, Unit::Percent));
                }
            }

            for (kind, bytes) in [
                ("disk_size", disk.total_bytes),
                ("disk_used", used),
                ("disk_avail", disk.available_bytes),
            ] {
                self.metrics.push(Metric::new(
                    format!("{}:{}", kind, mount),
                    Category::Disk,
                    bytes as f64,
                    Unit::Bytes,
                ));
            }
        }
    }

    fn add_interfaces(&mut self, result: SourceResult<Vec<InterfaceSample>>) {
        let interfaces = match result {
            Ok(interfaces) => interfaces,
            Err(e) => {
                self.fail(e);
                self.unknown(&["network"], Category::Network, Unit::Bytes);
                return;
            }
        };

        for iface in interfaces.into_iter().filter(|i| !is_loopback(&i.name)) {
            let name = &iface.name;
            self.metrics.push(Metric::new(
                format!("net_rx:{}", name),
                Category::Network,
                iface.rx_bytes as f64,
                Unit::Bytes,
            ));
            self.metrics.push(Metric::new(
                format!("net_tx:{}", name),
                Category::Network,
                iface.tx_bytes as f64,
                Unit::Bytes,
            ));
            self.metrics.push(Metric::new(
                format!("net_errors:{}", name),
                Category::Network,
                iface.rx_errors.saturating_add(iface.tx_errors) as f64,
                Unit::Count,
            ));
        }
    }

    fn finish(self, taken_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            taken_at,
            identity: self.identity,
            metrics: self.metrics,
            failures: self.failures,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
