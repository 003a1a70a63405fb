use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for wrong command line parameters
pub const EXIT_BAD_PARAMETERS: i32 = 2;
/// Exit code for a missing or unreadable configuration file
pub const EXIT_CONFIG: i32 = 3;
/// Exit code for a missing or unreadable load source
pub const EXIT_LOAD_SOURCE: i32 = 101;
/// Exit code for a missing or unreadable memory source
pub const EXIT_MEMORY_SOURCE: i32 = 102;
/// Exit code for a missing or unreadable mount table
pub const EXIT_MTAB_SOURCE: i32 = 103;
/// Exit code for a report that could not be delivered
pub const EXIT_DELIVERY: i32 = 104;
/// Exit code for anything else (digest state I/O and the like)
pub const EXIT_FAILURE: i32 = 1;

/// Custom error type for resmon
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Bad parameters: {0}")]
    BadParameters(String),

    #[error("Cannot read configuration file {path:?}: {source}")]
    ConfigUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot read load source {path:?}: {reason}")]
    LoadUnavailable { path: PathBuf, reason: String },

    #[error("Cannot read memory source {path:?}: {reason}")]
    MemoryUnavailable { path: PathBuf, reason: String },

    #[error("Cannot read mount table {path:?}: {reason}")]
    MtabUnavailable { path: PathBuf, reason: String },

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Digest state error for {path:?}: {source}")]
    DigestState {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for resmon
pub type Result<T> = std::result::Result<T, MonitorError>;

impl MonitorError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        MonitorError::Config(msg.into())
    }

    /// Create a delivery error
    pub fn delivery<S: Into<String>>(msg: S) -> Self {
        MonitorError::Delivery(msg.into())
    }

    pub fn load_unavailable<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        MonitorError::LoadUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn memory_unavailable<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        MonitorError::MemoryUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn mtab_unavailable<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        MonitorError::MtabUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code reserved for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            MonitorError::BadParameters(_) => EXIT_BAD_PARAMETERS,
            MonitorError::ConfigUnavailable { .. } | MonitorError::Config(_) => EXIT_CONFIG,
            MonitorError::LoadUnavailable { .. } => EXIT_LOAD_SOURCE,
            MonitorError::MemoryUnavailable { .. } => EXIT_MEMORY_SOURCE,
            MonitorError::MtabUnavailable { .. } => EXIT_MTAB_SOURCE,
            MonitorError::Delivery(_) => EXIT_DELIVERY,
            MonitorError::DigestState { .. } | MonitorError::Io(_) => EXIT_FAILURE,
        }
    }
}
