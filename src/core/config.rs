use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};

/// Historical location of the last-sent digest
pub const DEFAULT_DIGEST_FILE: &str = "/tmp/smpresdigest";
pub const DEFAULT_SMTP_HOST: &str = "localhost";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Filesystem thresholds: global default, per-mount overrides and exclusions.
///
/// An excluded mount point is never evaluated, even when it also carries an override.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FsPolicy {
    pub default_min_percent: f64,
    pub overrides: BTreeMap<String, f64>,
    pub excluded: BTreeSet<String>,
}

impl FsPolicy {
    /// Whether the mount table has to be scanned at all
    pub fn is_active(&self) -> bool {
        self.default_min_percent > 0.0 || self.overrides.values().any(|&p| p > 0.0)
    }

    /// Effective threshold for a mount point.
    ///
    /// `None` when the mount is excluded or its effective threshold is not
    /// positive (a zero threshold disables the check).
    pub fn threshold_for(&self, mount_point: &str) -> Option<f64> {
        if self.excluded.contains(mount_point) {
            return None;
        }
        let threshold = self
            .overrides
            .get(mount_point)
            .copied()
            .unwrap_or(self.default_min_percent);
        (threshold > 0.0).then_some(threshold)
    }
}

/// Maximum sizes (bytes) of watched files, iterated in path order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilePolicy {
    limits: BTreeMap<PathBuf, u64>,
}

impl FilePolicy {
    pub fn insert(&mut self, path: PathBuf, max_bytes: u64) {
        self.limits.insert(path, max_bytes);
    }

    pub fn get(&self, path: &Path) -> Option<u64> {
        self.limits.get(path).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, u64)> {
        self.limits.iter().map(|(path, max)| (path.as_path(), *max))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

/// Outbound relay settings
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub starttls: bool,
    /// Sender address; derived from the hostname when unset
    pub from: Option<String>,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.to_string(),
            port: DEFAULT_SMTP_PORT,
            username: None,
            password: None,
            starttls: true,
            from: None,
        }
    }
}

/// Immutable per-run configuration.
///
/// A threshold of `0` disables the corresponding check.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub email_addrs: Vec<String>,
    pub load_default_value: f64,
    pub swap_min_percent: f64,
    pub mem_min_percent: f64,
    pub fs: FsPolicy,
    pub files: FilePolicy,
    pub smtp: SmtpSettings,
    pub digest_file: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            email_addrs: Vec::new(),
            load_default_value: 0.0,
            swap_min_percent: 0.0,
            mem_min_percent: 0.0,
            fs: FsPolicy::default(),
            files: FilePolicy::default(),
            smtp: SmtpSettings::default(),
            digest_file: PathBuf::from(DEFAULT_DIGEST_FILE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Top,
    Filesystems,
    Excluded,
    Files,
}

impl MonitorConfig {
    /// Read and parse a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| MonitorError::ConfigUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        log::debug!(
            "Loaded {:?}: {} fs override(s), {} exclusion(s), {} file(s), {} recipient(s)",
            path,
            config.fs.overrides.len(),
            config.fs.excluded.len(),
            config.files.len(),
            config.email_addrs.len()
        );
        Ok(config)
    }

    /// Parse the line-oriented configuration format
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = MonitorConfig::default();
        let mut section = Section::Top;

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with("[FS]") || line.starts_with("[DEFAULTS]") {
                section = Section::Filesystems;
                continue;
            }
            if line.starts_with("[FS_EXCLUDED]") {
                section = Section::Excluded;
                continue;
            }
            if line.starts_with("[FILES]") {
                section = Section::Files;
                continue;
            }
            if line.starts_with('[') {
                log::debug!("Ignoring unknown section {}", line);
                section = Section::Top;
                continue;
            }

            if line.starts_with('/') {
                config.apply_path_entry(section, line);
            } else if let Some((key, value)) = line.split_once('=') {
                config.apply_key(key.trim(), value.trim())?;
            } else {
                log::debug!("Ignoring line without '=': {}", line);
            }
        }

        Ok(config)
    }

    fn apply_path_entry(&mut self, section: Section, line: &str) {
        match section {
            Section::Top => log::debug!("Ignoring path outside of a section: {}", line),
            Section::Filesystems => {
                let Some((mount, value)) = line.split_once('=') else {
                    log::warn!("Ignoring filesystem entry without threshold: {}", line);
                    return;
                };
                match value.trim().parse::<f64>() {
                    Ok(percent) => {
                        self.fs.overrides.insert(mount.trim().to_string(), percent);
                    }
                    Err(_) => log::warn!("Ignoring malformed filesystem threshold: {}", line),
                }
            }
            Section::Excluded => {
                let mount = line.split_once('=').map_or(line, |(mount, _)| mount);
                self.fs.excluded.insert(mount.trim().to_string());
            }
            Section::Files => {
                let Some((path, size)) = line.split_once('=') else {
                    return;
                };
                if let Some(max_bytes) = parse_size(size.trim()) {
                    self.files.insert(PathBuf::from(path.trim()), max_bytes);
                }
            }
        }
    }

    fn apply_key(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "email_addrs" => {
                self.email_addrs = value
                    .split(';')
                    .map(str::trim)
                    .filter(|addr| !addr.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "fs_default_min_percent" => self.fs.default_min_percent = parse_float(key, value)?,
            "load_default_value" => self.load_default_value = parse_float(key, value)?,
            "swap_min_percent" => self.swap_min_percent = parse_float(key, value)?,
            "mem_min_percent" => self.mem_min_percent = parse_float(key, value)?,
            "smtp_host" => self.smtp.host = value.to_string(),
            "smtp_port" => {
                self.smtp.port = value.parse().map_err(|_| {
                    MonitorError::config(format!("invalid value for {}: {:?}", key, value))
                })?
            }
            "smtp_username" => self.smtp.username = non_empty(value),
            "smtp_password" => self.smtp.password = Some(value.to_string()),
            "smtp_starttls" => self.smtp.starttls = parse_bool(key, value)?,
            "smtp_from" => self.smtp.from = non_empty(value),
            "digest_file" => self.digest_file = PathBuf::from(value),
            _ => log::debug!("Ignoring unknown key {}", key),
        }
        Ok(())
    }
}

/// Parse a human size string: digits optionally followed by `K`, `M` or `G`
/// (powers of 1024). Returns `None` for anything else.
pub fn parse_size(text: &str) -> Option<u64> {
    let last = text.chars().last()?;
    let exponent = match last.to_ascii_uppercase() {
        'K' => 1,
        'M' => 2,
        'G' => 3,
        _ => 0,
    };
    let digits = if exponent == 0 {
        text
    } else {
        &text[..text.len() - 1]
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;
    value.checked_mul(1024u64.pow(exponent))
}

fn parse_float(key: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| MonitorError::config(format!("invalid value for {}: {:?}", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(MonitorError::config(format!(
            "invalid value for {}: {:?}",
            key, value
        ))),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
