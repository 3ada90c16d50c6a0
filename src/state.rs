//! Durable announcement state.
//!
//! The state file is a JSON object with a single `posted` field holding the
//! identifiers of every entry that has ever been announced. The set only
//! grows. A missing file is not an error: it is the first-run signal.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{HeraldError, Result};

/// Serialized form of the state file.
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    /// Identifiers of previously announced entries. Order carries no
    /// meaning; duplicates are tolerated on load.
    #[serde(default)]
    posted: Vec<String>,
}

/// Persistence seam for announcement state.
///
/// The announcer persists through this trait so tests can capture commit
/// points without touching a filesystem.
pub trait StateSink {
    /// Persist the full set of announced identifiers.
    fn persist(&mut self, posted: &BTreeSet<String>) -> Result<()>;
}

/// File-backed state store.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store backed by the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the announced-identifier set.
    ///
    /// A missing file yields an empty set. A file that exists but cannot be
    /// read or parsed is an error: treating it as empty would classify the
    /// run as a first run and silently re-prime the entire feed.
    pub fn load(&self) -> Result<BTreeSet<String>> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            HeraldError::State(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let file: StateFile = serde_json::from_str(&content).map_err(|e| {
            HeraldError::State(format!("failed to parse {}: {}", self.path.display(), e))
        })?;
        Ok(file.posted.into_iter().collect())
    }

    /// Save the full set, creating missing parent directories.
    ///
    /// Writes to a temp file in the target directory and renames it over
    /// the target, so an interrupted save leaves the previous snapshot
    /// intact.
    pub fn save(&self, posted: &BTreeSet<String>) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                HeraldError::State(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let file = StateFile {
            posted: posted.iter().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| HeraldError::State(format!("failed to serialize state: {}", e)))?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| {
            HeraldError::State(format!("failed to create temp file: {}", e))
        })?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| HeraldError::State(format!("failed to write state: {}", e)))?;
        tmp.flush()
            .map_err(|e| HeraldError::State(format!("failed to write state: {}", e)))?;
        tmp.persist(&self.path).map_err(|e| {
            HeraldError::State(format!("failed to replace {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }
}

impl StateSink for StateStore {
    fn persist(&mut self, posted: &BTreeSet<String>) -> Result<()> {
        self.save(posted)
    }
}
