//! On-disk state and credential storage.
//!
//! This module provides the storage layer for a campaign:
//!
//! - JSON checkpoint with write-then-rename replacement
//! - CSV contact table input and results table output
//! - OS keychain integration for the SMTP secret

mod checkpoint_store;
mod keychain;
mod tables;

pub use checkpoint_store::CheckpointStore;
pub use keychain::{KeychainError, SmtpSecret};
pub use tables::{read_contacts, write_results};

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading or writing campaign files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error while {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed checkpoint {path}: {source}")]
    MalformedCheckpoint {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("table error in {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("table {path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: &'static str },
}

impl StorageError {
    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn table(path: &Path, source: csv::Error) -> Self {
        Self::Table {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
