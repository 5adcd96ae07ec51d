//! Capability interface over the host's metric data sources.
//!
//! The collector only ever talks to a [`MetricSource`], which keeps it
//! independent of the OS and lets tests substitute canned data.

use crate::error::CollectionError;

use super::metrics::{
    CpuSample, DiskSample, IdentitySample, InterfaceSample, LoadSample, MemorySample, SwapSample,
};

pub type SourceResult<T> = std::result::Result<T, CollectionError>;

/// One method per OS query. Each call reads system state and nothing else.
///
/// Implementations may block; the collector runs every call on a blocking
/// thread under a timeout.
pub trait MetricSource: Send + Sync {
    fn identity(&self) -> SourceResult<IdentitySample>;

    fn cpu(&self) -> SourceResult<CpuSample>;

    fn load(&self) -> SourceResult<LoadSample>;

    fn memory(&self) -> SourceResult<MemorySample>;

    /// Should return [`CollectionError::Unavailable`] when no swap is configured.
    fn swap(&self) -> SourceResult<SwapSample>;

    /// Every mounted filesystem, pseudo filesystems included.
    fn disks(&self) -> SourceResult<Vec<DiskSample>>;

    /// Every network interface, loopback included.
    fn interfaces(&self) -> SourceResult<Vec<InterfaceSample>>;
}
