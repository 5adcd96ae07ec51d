//! [`MetricSource`] backed by the `sysinfo` crate.
//!
//! Every query builds its own sysinfo handle and refreshes only what it
//! reads, so queries can run concurrently on separate blocking threads.

use log::debug;
use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};

use crate::core::health::{
    CpuSample, DiskSample, IdentitySample, InterfaceSample, LoadSample, MemorySample,
    MetricSource, SourceResult, SwapSample, SystemIdentity,
};
use crate::error::CollectionError;

use super::statvfs::inode_usage;

/// Reads the live host
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoSource;

impl SysinfoSource {
    pub fn new() -> Self {
        Self
    }

    fn memory_system() -> System {
        System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        )
    }
}

impl MetricSource for SysinfoSource {
    fn identity(&self) -> SourceResult<IdentitySample> {
        let identity = SystemIdentity {
            hostname: System::host_name(),
            os: System::long_os_version().or_else(System::name),
            kernel: System::kernel_version(),
            architecture: Some(std::env::consts::ARCH.to_string()),
        };

        Ok(IdentitySample {
            identity,
            uptime_secs: System::uptime(),
        })
    }

    fn cpu(&self) -> SourceResult<CpuSample> {
        let refresh = RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage());
        let mut sys = System::new_with_specifics(refresh);

        // Usage is a delta between two refreshes
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();

        let logical_cores = sys.cpus().len();
        if logical_cores == 0 {
            return Err(CollectionError::unavailable("cpu", "no CPUs reported"));
        }

        Ok(CpuSample {
            logical_cores,
            usage_percent: f64::from(sys.global_cpu_usage()),
        })
    }

    #[cfg(windows)]
    fn load(&self) -> SourceResult<LoadSample> {
        Err(CollectionError::unavailable(
            "load",
            "load average is not available on Windows",
        ))
    }

    #[cfg(not(windows))]
    fn load(&self) -> SourceResult<LoadSample> {
        let load = System::load_average();
        Ok(LoadSample {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    }

    fn memory(&self) -> SourceResult<MemorySample> {
        let sys = Self::memory_system();
        let total_bytes = sys.total_memory();
        if total_bytes == 0 {
            return Err(CollectionError::unavailable("memory", "total memory reported as 0"));
        }

        Ok(MemorySample {
            total_bytes,
            used_bytes: sys.used_memory(),
            free_bytes: sys.free_memory(),
            available_bytes: sys.available_memory(),
        })
    }

    fn swap(&self) -> SourceResult<SwapSample> {
        let sys = Self::memory_system();
        let total_bytes = sys.total_swap();
        if total_bytes == 0 {
            return Err(CollectionError::unavailable("swap", "no swap configured"));
        }

        Ok(SwapSample {
            total_bytes,
            used_bytes: sys.used_swap(),
        })
    }

    fn disks(&self) -> SourceResult<Vec<DiskSample>> {
        let disks = Disks::new_with_refreshed_list();
        if disks.list().is_empty() {
            return Err(CollectionError::unavailable("disks", "no mounted filesystems found"));
        }

        let samples = disks
            .list()
            .iter()
            .map(|disk| {
                let mount = disk.mount_point();
                DiskSample {
                    mount_point: mount.to_string_lossy().into_owned(),
                    fs_type: disk.file_system().to_string_lossy().into_owned(),
                    total_bytes: disk.total_space(),
                    available_bytes: disk.available_space(),
                    inodes: inode_usage(mount),
                }
            })
            .collect::<Vec<_>>();

        debug!("sysinfo reported {} filesystem(s)", samples.len());
        Ok(samples)
    }

    fn interfaces(&self) -> SourceResult<Vec<InterfaceSample>> {
        let networks = Networks::new_with_refreshed_list();

        let samples = networks
            .iter()
            .map(|(name, data)| InterfaceSample {
                name: name.to_string(),
                rx_bytes: data.total_received(),
                tx_bytes: data.total_transmitted(),
                rx_errors: data.total_errors_on_received(),
                tx_errors: data.total_errors_on_transmitted(),
            })
            .collect::<Vec<_>>();

        debug!("sysinfo reported {} interface(s)", samples.len());
        Ok(samples)
    }
}
