// Command handlers module
pub mod completions;
pub mod config;
pub mod report;
pub mod thresholds;
pub mod version;

use crate::error::{SysdashError, EXIT_INTERNAL};

// Re-exports for cleaner imports
pub use completions::execute as completions;
pub use report::execute as report;
pub use thresholds::execute as thresholds;
pub use version::execute as version;

/// Process exit code for a failed command
pub fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<SysdashError>())
        .map_or(EXIT_INTERNAL, SysdashError::exit_code)
}
