// Formatting helpers for reports and terminal output

pub mod formatters;

pub use formatters::{format_size, format_time, format_value};
