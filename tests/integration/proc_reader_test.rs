use resmon::core::{MetricReader, MonitorConfig, ProcMetricReader, ThresholdEvaluator};
use resmon::MonitorError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Sources {
    dir: TempDir,
}

impl Sources {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn write(&self, name: &str, content: &str) -> &Self {
        fs::write(self.dir.path().join(name), content).unwrap();
        self
    }

    fn reader(&self) -> ProcMetricReader {
        let path = |name: &str| self.dir.path().join(name);
        ProcMetricReader::with_sources(path("loadavg"), path("meminfo"), path("mtab"))
    }
}

#[test]
fn test_reads_procfs_style_sources() {
    let sources = Sources::new();
    sources
        .write("loadavg", "1.25 0.90 0.50 2/512 4242\n")
        .write(
            "meminfo",
            "MemTotal: 2000 kB\nMemFree: 500 kB\nSwapTotal: 1000 kB\nSwapFree: 1000 kB\n",
        )
        .write("mtab", "proc /proc proc rw 0 0\n/dev/sda1 / ext4 rw 0 0\n");
    let reader = sources.reader();

    assert_eq!(reader.read_load().unwrap(), 1.25);
    let memory = reader.read_memory().unwrap();
    assert_eq!(memory.mem_percent(), 75.0);
    assert_eq!(memory.swap_percent(), 0.0);
    assert_eq!(reader.list_mounted_filesystems().unwrap(), vec!["/proc", "/"]);
}

#[test]
fn test_missing_mandatory_sources_map_to_exit_codes() {
    let reader = Sources::new().reader();

    let err = reader.read_load().unwrap_err();
    assert!(matches!(err, MonitorError::LoadUnavailable { .. }));
    assert_eq!(err.exit_code(), 101);

    let err = reader.read_memory().unwrap_err();
    assert!(matches!(err, MonitorError::MemoryUnavailable { .. }));
    assert_eq!(err.exit_code(), 102);

    let err = reader.list_mounted_filesystems().unwrap_err();
    assert!(matches!(err, MonitorError::MtabUnavailable { .. }));
    assert_eq!(err.exit_code(), 103);
}

#[test]
fn test_malformed_load_is_unavailable() {
    let sources = Sources::new();
    sources.write("loadavg", "garbage\n");
    let err = sources.reader().read_load().unwrap_err();
    assert!(matches!(err, MonitorError::LoadUnavailable { .. }));
}

#[test]
fn test_unmounted_or_missing_entries_are_skipped() {
    let sources = Sources::new();
    let missing_mount = sources.dir.path().join("not-mounted");
    sources.write(
        "mtab",
        &format!("none {} ext4 rw 0 0\n", missing_mount.display()),
    );
    let reader = sources.reader();

    let mut config = MonitorConfig::default();
    config.fs.default_min_percent = 0.001;
    config
        .files
        .insert(sources.dir.path().join("absent.log"), 0);

    let violations = ThresholdEvaluator::new(&config).evaluate(&reader).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_real_file_over_limit() {
    let sources = Sources::new();
    sources.write("big.log", "0123456789");
    let reader = sources.reader();
    let path = sources.dir.path().join("big.log");

    assert_eq!(reader.file_size(&path), 10);
    assert_eq!(reader.file_size(Path::new("/definitely/not/here")), -1);

    let mut config = MonitorConfig::default();
    config.files.insert(path.clone(), 9);
    let violations = ThresholdEvaluator::new(&config).evaluate(&reader).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].observed, 10.0);
}

#[test]
fn test_disabled_checks_do_not_touch_sources() {
    // none of the source files exist; with every check off nothing is read
    let reader = Sources::new().reader();
    let violations = ThresholdEvaluator::new(&MonitorConfig::default())
        .evaluate(&reader)
        .unwrap();
    assert!(violations.is_empty());
}
