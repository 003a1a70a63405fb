//! Duplicate suppression.
//!
//! The SHA-256 of the last delivered report body is kept in a state file; a
//! report whose digest matches it is not sent again.

use sha2::{Digest as _, Sha256};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};

/// Lowercase hex SHA-256 of a report body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest(String);

impl Digest {
    pub fn of(body: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(body.as_bytes());
        Digest(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// New report; persist the digest once it has been delivered
    Send(Digest),
    /// Empty report, or identical to the last delivered one
    Suppress,
}

/// Gate backed by the persisted digest file.
///
/// No locking: runs are expected not to overlap.
#[derive(Debug, Clone)]
pub struct DigestGate {
    path: PathBuf,
}

impl DigestGate {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Digest stored by the last delivery, empty when there is none
    pub fn last_digest(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(text) => text.trim().to_string(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                log::warn!("Cannot read digest file {:?}: {}", self.path, e);
                String::new()
            }
        }
    }

    /// Decide whether `body` must be sent. Does not touch the state file.
    pub fn check(&self, body: &str) -> GateDecision {
        if body.is_empty() {
            return GateDecision::Suppress;
        }
        let digest = Digest::of(body);
        if digest.as_str() == self.last_digest() {
            log::info!("Report unchanged since last delivery ({})", digest);
            GateDecision::Suppress
        } else {
            GateDecision::Send(digest)
        }
    }

    /// Overwrite the state file with `digest`
    pub fn persist(&self, digest: &Digest) -> Result<()> {
        let to_state_error = |source| MonitorError::DigestState {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(to_state_error)?;
            }
        }
        fs::write(&self.path, digest.as_str()).map_err(to_state_error)?;
        log::debug!("Persisted digest {} to {:?}", digest, self.path);
        Ok(())
    }
}
