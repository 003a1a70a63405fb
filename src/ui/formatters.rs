use chrono::{DateTime, Local};

const SIZE_UNITS: [&str; 5] = ["bytes", "KiB", "MiB", "GiB", "TiB"];

/// Format a byte count in base-1024 units with one decimal (`10.0 MiB`)
pub fn format_size(size: f64) -> String {
    let mut value = size;
    for unit in &SIZE_UNITS[..SIZE_UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{:3.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:3.1} {}", value, SIZE_UNITS[SIZE_UNITS.len() - 1])
}

/// Format a measurement in shortest round-trip form, keeping one decimal
/// for whole numbers (`0.8`, `95.0`, `95.12`)
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Format timestamp as `YYYY-MM-DD HH:MM:SS`
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}
