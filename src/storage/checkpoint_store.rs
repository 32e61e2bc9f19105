//! Checkpoint persistence.
//!
//! The checkpoint is a single JSON document rewritten in full on every save.
//! Writes go to a sibling temp file which is then renamed over the target, so
//! a crash mid-write leaves the previous checkpoint intact.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Result, StorageError};
use crate::domain::{Checkpoint, SentEmail};

/// Reads and writes the campaign checkpoint file.
///
/// Only one process may use a given checkpoint path at a time; concurrent
/// writers are not detected and the last writer wins.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the checkpoint file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the checkpoint.
    ///
    /// A missing file is a fresh start and yields `{0, []}`. Any other read or
    /// parse failure is returned as an error.
    pub fn load(&self) -> Result<Checkpoint> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No checkpoint, starting fresh");
                return Ok(Checkpoint::default());
            }
            Err(e) => return Err(StorageError::io("opening checkpoint", &self.path, e)),
        };

        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            StorageError::MalformedCheckpoint {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Replaces the checkpoint with `{index, sent_emails}`.
    pub fn save(&self, index: usize, sent_emails: &[SentEmail]) -> Result<()> {
        #[derive(serde::Serialize)]
        struct CheckpointRef<'a> {
            last_processed_index: usize,
            sent_emails: &'a [SentEmail],
        }

        let tmp_path = self.tmp_path();
        {
            let file = File::create(&tmp_path)
                .map_err(|e| StorageError::io("creating checkpoint", &tmp_path, e))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(
                &mut writer,
                &CheckpointRef {
                    last_processed_index: index,
                    sent_emails,
                },
            )
            .map_err(|e| StorageError::io("writing checkpoint", &tmp_path, e.into()))?;
            writer
                .flush()
                .map_err(|e| StorageError::io("flushing checkpoint", &tmp_path, e))?;
        }

        fs::rename(&tmp_path, &self.path)
            .map_err(|e| StorageError::io("replacing checkpoint", &self.path, e))?;

        debug!(index, sent = sent_emails.len(), "Checkpoint saved");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "checkpoint".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
