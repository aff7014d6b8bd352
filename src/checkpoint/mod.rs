//! Checkpoint store — JSON-lines conversation snapshots on disk.
//!
//! One file per checkpoint under a fixed directory (default
//! `~/.taskdeck/checkpoints`): `<id>.jsonl`, where the first line is a
//! [`CheckpointMeta`] header and every following line one
//! [`CheckpointEntry`]. `list` reads only headers; `restore` parses the
//! whole file.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint not found: {0}")]
    NotFound(String),

    #[error("malformed checkpoint at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Header line of a checkpoint file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMeta {
    pub id: String,
    pub title: String,
    /// Unix epoch millis.
    pub created_at: u64,
    /// Number of conversation entries that follow the header.
    pub entries: usize,
}

/// One conversation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointEntry {
    /// "user", "agent", or "system".
    pub role: String,
    pub text: String,
}

/// Directory-backed checkpoint store.
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All checkpoint headers, newest first. A missing directory is an
    /// empty store, not an error; unreadable files are skipped with a
    /// warning so one bad snapshot cannot hide the rest.
    pub fn list(&self) -> CheckpointResult<Vec<CheckpointMeta>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut metas = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
                continue;
            }
            match read_header(&path) {
                Ok(meta) => metas.push(meta),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping checkpoint: {e}");
                }
            }
        }
        metas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(metas)
    }

    /// Read one checkpoint in full.
    pub fn restore(&self, id: &str) -> CheckpointResult<(CheckpointMeta, Vec<CheckpointEntry>)> {
        let path = self.path_for(id);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CheckpointError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut lines = BufReader::new(file).lines();
        let header = lines.next().ok_or(CheckpointError::Malformed {
            line: 1,
            reason: "empty file".into(),
        })??;
        let meta: CheckpointMeta =
            serde_json::from_str(&header).map_err(|e| CheckpointError::Malformed {
                line: 1,
                reason: e.to_string(),
            })?;

        let mut entries = Vec::new();
        for (i, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: CheckpointEntry =
                serde_json::from_str(&line).map_err(|e| CheckpointError::Malformed {
                    line: i + 2,
                    reason: e.to_string(),
                })?;
            entries.push(entry);
        }
        Ok((meta, entries))
    }

    /// Write a checkpoint (header + entries). Used by tests and by hosts
    /// that snapshot the chat log.
    pub fn save(&self, meta: &CheckpointMeta, entries: &[CheckpointEntry]) -> CheckpointResult<()> {
        fs::create_dir_all(&self.dir)?;
        let mut out = serde_json::to_string(meta).map_err(|e| CheckpointError::Malformed {
            line: 1,
            reason: e.to_string(),
        })?;
        for entry in entries {
            out.push('\n');
            out.push_str(&serde_json::to_string(entry).map_err(|e| {
                CheckpointError::Malformed {
                    line: 0,
                    reason: e.to_string(),
                }
            })?);
        }
        out.push('\n');
        fs::write(self.path_for(&meta.id), out)?;
        Ok(())
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.jsonl"))
    }
}

fn read_header(path: &Path) -> CheckpointResult<CheckpointMeta> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut header = String::new();
    reader.read_line(&mut header)?;
    if header.trim().is_empty() {
        return Err(CheckpointError::Malformed {
            line: 1,
            reason: "empty file".into(),
        });
    }
    serde_json::from_str(header.trim_end()).map_err(|e| CheckpointError::Malformed {
        line: 1,
        reason: e.to_string(),
    })
}
