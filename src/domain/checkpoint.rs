//! Checkpoint domain type.
//!
//! The resume position plus the log of successful sends so far.

use serde::{Deserialize, Serialize};

use super::SentEmail;

/// Persisted campaign progress.
///
/// `last_processed_index` is the index of the next contact row to process.
/// The driver only ever writes it with a larger value than it read at start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Index of the next unprocessed contact row.
    pub last_processed_index: usize,
    /// Every successful send recorded so far, in send order.
    pub sent_emails: Vec<SentEmail>,
}

impl Checkpoint {
    /// Creates a checkpoint at `index` with the given sends.
    pub fn new(last_processed_index: usize, sent_emails: Vec<SentEmail>) -> Self {
        Self {
            last_processed_index,
            sent_emails,
        }
    }

    /// Returns whether this is the fresh-start checkpoint `{0, []}`.
    pub fn is_fresh(&self) -> bool {
        self.last_processed_index == 0 && self.sent_emails.is_empty()
    }
}
