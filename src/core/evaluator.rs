//! Threshold evaluation.
//!
//! Compares current readings against the configured thresholds and produces
//! the violations in report order: load, swap, memory, filesystems, files.

use super::config::MonitorConfig;
use super::metrics::MetricReader;
use crate::error::Result;

/// Resource class of a violation, declared in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Load,
    MemorySwap,
    MemoryRam,
    Filesystem,
    File,
}

impl Category {
    /// Short tag used in report lines
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Load => "loa",
            Category::MemorySwap | Category::MemoryRam => "mem",
            Category::Filesystem => "hdd",
            Category::File => "fil",
        }
    }
}

/// A resource whose observed value breaches its threshold.
///
/// `observed` and `limit` are percentages for memory, swap and filesystems,
/// the raw load average for load, and bytes for files.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub category: Category,
    pub label: String,
    pub observed: f64,
    pub limit: f64,
}

impl Violation {
    fn new(category: Category, label: impl Into<String>, observed: f64, limit: f64) -> Self {
        Self {
            category,
            label: label.into(),
            observed,
            limit,
        }
    }
}

/// Decides which resources violate their thresholds.
///
/// Sources are only read for checks that are enabled.
pub struct ThresholdEvaluator<'a> {
    config: &'a MonitorConfig,
}

impl<'a> ThresholdEvaluator<'a> {
    pub fn new(config: &'a MonitorConfig) -> Self {
        Self { config }
    }

    /// Evaluate every enabled check.
    ///
    /// Fails only when a mandatory source (load, memory, mount table) cannot be read.
    pub fn evaluate<R: MetricReader + ?Sized>(&self, reader: &R) -> Result<Vec<Violation>> {
        let mut violations = Vec::new();
        self.check_load(reader, &mut violations)?;
        self.check_memory(reader, &mut violations)?;
        self.check_filesystems(reader, &mut violations)?;
        self.check_files(reader, &mut violations);
        log::debug!("Evaluation found {} violation(s)", violations.len());
        Ok(violations)
    }

    fn check_load<R: MetricReader + ?Sized>(
        &self,
        reader: &R,
        out: &mut Vec<Violation>,
    ) -> Result<()> {
        let limit = self.config.load_default_value;
        if limit <= 0.0 {
            return Ok(());
        }
        let load = reader.read_load()?;
        if load >= limit {
            out.push(Violation::new(Category::Load, "load", load, limit));
        }
        Ok(())
    }

    fn check_memory<R: MetricReader + ?Sized>(
        &self,
        reader: &R,
        out: &mut Vec<Violation>,
    ) -> Result<()> {
        let swap_limit = self.config.swap_min_percent;
        let mem_limit = self.config.mem_min_percent;
        if swap_limit <= 0.0 && mem_limit <= 0.0 {
            return Ok(());
        }

        let memory = reader.read_memory()?;
        let swap = memory.swap_percent();
        let mem = memory.mem_percent();

        if swap_limit > 0.0 && swap >= swap_limit {
            out.push(Violation::new(Category::MemorySwap, "swap", swap, swap_limit));
        }
        if mem_limit > 0.0 && mem >= mem_limit {
            out.push(Violation::new(Category::MemoryRam, "mem", mem, mem_limit));
        }
        Ok(())
    }

    fn check_filesystems<R: MetricReader + ?Sized>(
        &self,
        reader: &R,
        out: &mut Vec<Violation>,
    ) -> Result<()> {
        let policy = &self.config.fs;
        if !policy.is_active() {
            return Ok(());
        }

        for mount in reader.list_mounted_filesystems()? {
            let Some(threshold) = policy.threshold_for(&mount) else {
                continue;
            };
            let usage = reader.filesystem_usage_percent(&mount);
            if usage < 0.0 {
                log::debug!("No usage figure for {}, skipping", mount);
                continue;
            }
            if usage >= threshold {
                out.push(Violation::new(Category::Filesystem, mount, usage, threshold));
            }
        }
        Ok(())
    }

    fn check_files<R: MetricReader + ?Sized>(&self, reader: &R, out: &mut Vec<Violation>) {
        for (path, max_bytes) in self.config.files.iter() {
            let size = reader.file_size(path);
            if size < 0 {
                log::debug!("{:?} not present, skipping", path);
                continue;
            }
            // strictly greater: a file exactly at its limit is fine
            if size as u64 > max_bytes {
                out.push(Violation::new(
                    Category::File,
                    path.display().to_string(),
                    size as f64,
                    max_bytes as f64,
                ));
            }
        }
    }
}
