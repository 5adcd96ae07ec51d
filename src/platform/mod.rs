// Platform-specific code module

pub mod statvfs;
pub mod sysinfo_source;

// Re-exports para imports limpios
pub use statvfs::inode_usage;
pub use sysinfo_source::SysinfoSource;
