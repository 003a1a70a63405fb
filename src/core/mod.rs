// Core business logic module

pub mod config;
pub mod digest;
pub mod evaluator;
pub mod metrics;
pub mod monitor;
pub mod notifier;
pub mod report;

// Re-export commonly used items
pub use config::{FilePolicy, FsPolicy, MonitorConfig, SmtpSettings};
pub use digest::{Digest, DigestGate, GateDecision};
pub use evaluator::{Category, ThresholdEvaluator, Violation};
pub use metrics::{MemoryInfo, MetricReader, ProcMetricReader};
pub use monitor::{Monitor, Prepared, RunOutcome};
pub use notifier::{Notifier, SmtpNotifier};
pub use report::{AlertMessage, ReportBuilder};
