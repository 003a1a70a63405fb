// Platform-specific code module

pub mod fs;
pub mod host;

pub use fs::{file_size, filesystem_usage_percent};
pub use host::hostname;
