#![allow(dead_code)]

use resmon::core::{AlertMessage, MemoryInfo, MetricReader, Notifier};
use resmon::{MonitorError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory metric source
#[derive(Debug, Clone, Default)]
pub struct FakeReader {
    pub load: Option<f64>,
    pub memory: Option<MemoryInfo>,
    pub mounts: Vec<(String, f64)>,
    pub files: HashMap<PathBuf, i64>,
}

impl MetricReader for FakeReader {
    fn read_load(&self) -> Result<f64> {
        self.load
            .ok_or_else(|| MonitorError::load_unavailable("/proc/loadavg", "not provided"))
    }

    fn read_memory(&self) -> Result<MemoryInfo> {
        self.memory
            .ok_or_else(|| MonitorError::memory_unavailable("/proc/meminfo", "not provided"))
    }

    fn list_mounted_filesystems(&self) -> Result<Vec<String>> {
        Ok(self.mounts.iter().map(|(mount, _)| mount.clone()).collect())
    }

    fn filesystem_usage_percent(&self, mount_point: &str) -> f64 {
        self.mounts
            .iter()
            .find(|(mount, _)| mount == mount_point)
            .map_or(-1.0, |(_, percent)| *percent)
    }

    fn file_size(&self, path: &Path) -> i64 {
        self.files.get(path).copied().unwrap_or(-1)
    }
}

/// Records delivered messages instead of mailing them
#[derive(Debug, Default)]
pub struct Outbox {
    pub sent: RefCell<Vec<(AlertMessage, Vec<String>)>>,
}

impl Notifier for Outbox {
    fn send(&self, message: &AlertMessage, recipients: &[String]) -> Result<()> {
        self.sent
            .borrow_mut()
            .push((message.clone(), recipients.to_vec()));
        Ok(())
    }
}
