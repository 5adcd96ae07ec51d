// sysdash library - public API

// Re-export error types
pub mod error;
pub use error::{CollectionError, Result, SysdashError};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::{Config, Thresholds};
pub use core::health::{DashboardRunner, MetricCollector, MetricSource, Report, StatusTier};
pub use platform::SysinfoSource;
pub use ui::OutputFormat;

/// Initialize logging to stderr.
///
/// `verbosity` counts `-v` flags: 0 is warn, 1 is info, 2 or more is debug.
/// `RUST_LOG` still overrides the level.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    // Ignore the error if a logger is already installed (tests)
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}
