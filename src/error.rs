use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit code for a healthy snapshot
pub const EXIT_OK: i32 = 0;
/// Exit code when the worst tier is WARNING
pub const EXIT_WARNING: i32 = 1;
/// Exit code when the worst tier is CRITICAL
pub const EXIT_CRITICAL: i32 = 2;
/// Exit code for configuration, format and other internal failures
pub const EXIT_INTERNAL: i32 = 3;

/// Fatal error type for sysdash.
///
/// Anything that reaches the user as one of these aborts the run with
/// [`EXIT_INTERNAL`]. Per-metric failures use [`CollectionError`] instead and
/// never escalate.
#[derive(Error, Debug)]
pub enum SysdashError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error in '{key}': {details}")]
    Configuration { key: String, details: String },

    #[error("Configuration file not found: {}", path.display())]
    MissingConfig { path: PathBuf },

    #[error("Unsupported output format '{0}' (expected one of: human, structured, json)")]
    UnsupportedFormat(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result type alias for sysdash
pub type Result<T> = std::result::Result<T, SysdashError>;

impl SysdashError {
    /// Create a configuration error naming the offending key
    pub fn configuration<K: Into<String>, S: Into<String>>(key: K, details: S) -> Self {
        SysdashError::Configuration {
            key: key.into(),
            details: details.into(),
        }
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        SysdashError::Render(msg.into())
    }

    pub fn runtime<S: Into<String>>(msg: S) -> Self {
        SysdashError::Runtime(msg.into())
    }

    /// Process exit code for this error. All fatal errors share one code.
    pub fn exit_code(&self) -> i32 {
        EXIT_INTERNAL
    }
}

/// A single OS query that could not produce data.
///
/// Recovered by the collector: the metrics the query would have produced are
/// recorded as unknown and collection moves on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectionError {
    #[error("{query} unavailable: {details}")]
    Unavailable { query: &'static str, details: String },

    #[error("{query} timed out after {}ms", after.as_millis())]
    TimedOut { query: &'static str, after: Duration },

    #[error("{query} failed: {details}")]
    Failed { query: &'static str, details: String },
}

impl CollectionError {
    pub fn unavailable<S: Into<String>>(query: &'static str, details: S) -> Self {
        CollectionError::Unavailable {
            query,
            details: details.into(),
        }
    }

    pub fn failed<S: Into<String>>(query: &'static str, details: S) -> Self {
        CollectionError::Failed {
            query,
            details: details.into(),
        }
    }

    /// Name of the query that failed
    pub fn query(&self) -> &'static str {
        match self {
            CollectionError::Unavailable { query, .. }
            | CollectionError::TimedOut { query, .. }
            | CollectionError::Failed { query, .. } => query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_names_key() {
        let err = SysdashError::configuration("cpu_warning", "expected a number");
        assert_eq!(
            err.to_string(),
            "Configuration error in 'cpu_warning': expected a number"
        );
        assert_eq!(err.exit_code(), EXIT_INTERNAL);
    }

    #[test]
    fn test_timeout_message() {
        let err = CollectionError::TimedOut {
            query: "disks",
            after: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "disks timed out after 1500ms");
        assert_eq!(err.query(), "disks");
    }
}
