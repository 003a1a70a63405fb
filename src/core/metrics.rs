//! Raw metric sources.
//!
//! `MetricReader` is the seam between the threshold evaluator and the host.
//! `ProcMetricReader` is the Linux implementation backed by procfs, the mount
//! table and `statvfs(2)`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};
use crate::platform;

pub const LOAD_FILE: &str = "/proc/loadavg";
pub const MEM_FILE: &str = "/proc/meminfo";
pub const MTAB_FILE: &str = "/etc/mtab";

/// Memory and swap counters, in the unit of the source (kB for procfs)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryInfo {
    pub mem_total: f64,
    pub mem_free: f64,
    pub swap_total: f64,
    pub swap_free: f64,
}

impl MemoryInfo {
    pub fn mem_percent(&self) -> f64 {
        used_percent(self.mem_total, self.mem_free)
    }

    pub fn swap_percent(&self) -> f64 {
        used_percent(self.swap_total, self.swap_free)
    }
}

/// Used share of `total`, rounded to two decimals.
///
/// Returns `-1.0` when `total` is not positive, which never reaches a threshold.
pub fn used_percent(total: f64, free: f64) -> f64 {
    if total <= 0.0 {
        return -1.0;
    }
    ((total - free) / total * 100.0 * 100.0).round() / 100.0
}

/// Current-state readings the evaluator depends on.
///
/// Mandatory sources (`read_load`, `read_memory`, `list_mounted_filesystems`)
/// fail loudly; per-entry sources return `-1` instead of failing.
pub trait MetricReader {
    /// One-minute load average
    fn read_load(&self) -> Result<f64>;

    fn read_memory(&self) -> Result<MemoryInfo>;

    /// Mount points in mount-table order, without duplicates
    fn list_mounted_filesystems(&self) -> Result<Vec<String>>;

    /// Used percentage of the filesystem mounted at `mount_point`, `-1` on error
    fn filesystem_usage_percent(&self, mount_point: &str) -> f64;

    /// Size in bytes of a regular file, `-1` if absent
    fn file_size(&self, path: &Path) -> i64;
}

/// Reads metrics from procfs and the mount table
#[derive(Debug, Clone)]
pub struct ProcMetricReader {
    load_file: PathBuf,
    mem_file: PathBuf,
    mtab_file: PathBuf,
}

impl Default for ProcMetricReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcMetricReader {
    pub fn new() -> Self {
        Self::with_sources(LOAD_FILE, MEM_FILE, MTAB_FILE)
    }

    /// Reader over alternative source files (used by tests and chroots)
    pub fn with_sources<P: Into<PathBuf>>(load_file: P, mem_file: P, mtab_file: P) -> Self {
        Self {
            load_file: load_file.into(),
            mem_file: mem_file.into(),
            mtab_file: mtab_file.into(),
        }
    }
}

impl MetricReader for ProcMetricReader {
    fn read_load(&self) -> Result<f64> {
        let text = fs::read_to_string(&self.load_file)
            .map_err(|e| MonitorError::load_unavailable(&self.load_file, e.to_string()))?;
        parse_loadavg(&text)
            .ok_or_else(|| MonitorError::load_unavailable(&self.load_file, "malformed content"))
    }

    fn read_memory(&self) -> Result<MemoryInfo> {
        let text = fs::read_to_string(&self.mem_file)
            .map_err(|e| MonitorError::memory_unavailable(&self.mem_file, e.to_string()))?;
        parse_meminfo(&text)
            .map_err(|reason| MonitorError::memory_unavailable(&self.mem_file, reason))
    }

    fn list_mounted_filesystems(&self) -> Result<Vec<String>> {
        let text = fs::read_to_string(&self.mtab_file)
            .map_err(|e| MonitorError::mtab_unavailable(&self.mtab_file, e.to_string()))?;
        Ok(parse_mtab(&text))
    }

    fn filesystem_usage_percent(&self, mount_point: &str) -> f64 {
        platform::fs::filesystem_usage_percent(Path::new(mount_point))
    }

    fn file_size(&self, path: &Path) -> i64 {
        platform::fs::file_size(path)
    }
}

/// First whitespace-delimited field of `/proc/loadavg`
pub fn parse_loadavg(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}

/// Extract `MemTotal`, `MemFree`, `SwapTotal` and `SwapFree` from `/proc/meminfo`
pub fn parse_meminfo(text: &str) -> std::result::Result<MemoryInfo, String> {
    let mut mem_total = None;
    let mut mem_free = None;
    let mut swap_total = None;
    let mut swap_free = None;

    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut mem_total,
            "MemFree" => &mut mem_free,
            "SwapTotal" => &mut swap_total,
            "SwapFree" => &mut swap_free,
            _ => continue,
        };
        let value = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<f64>().ok())
            .ok_or_else(|| format!("malformed {} line", key.trim()))?;
        *slot = Some(value);
    }

    let require = |value: Option<f64>, name: &str| value.ok_or_else(|| format!("missing {}", name));
    Ok(MemoryInfo {
        mem_total: require(mem_total, "MemTotal")?,
        mem_free: require(mem_free, "MemFree")?,
        swap_total: require(swap_total, "SwapTotal")?,
        swap_free: require(swap_free, "SwapFree")?,
    })
}

/// Mount points (second field) of an fstab-style table, first occurrence wins
pub fn parse_mtab(text: &str) -> Vec<String> {
    let mut mounts: Vec<String> = Vec::new();
    for line in text.lines() {
        let Some(field) = line.split_whitespace().nth(1) else {
            continue;
        };
        let mount = unescape_mount_field(field);
        if !mounts.contains(&mount) {
            mounts.push(mount);
        }
    }
    mounts
}

/// Decode the `\ooo` octal escapes the kernel uses for spaces, tabs and backslashes
fn unescape_mount_field(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let octal = &bytes[i + 1..i + 4];
            if octal.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let code = octal
                    .iter()
                    .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                if let Ok(code) = u8::try_from(code) {
                    out.push(code);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
