//! Sent-email records.
//!
//! One record is created per successful delivery attempt. Records are
//! append-only and are persisted both in the checkpoint and in the final
//! results table.

use serde::{Deserialize, Serialize};

use super::Contact;

/// Outcome recorded for a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    /// The relay accepted the message.
    Sent,
}

/// A successful delivery to one candidate address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentEmail {
    /// Name of the contact, as read from the table.
    pub recruiter_name: String,
    /// Candidate address the message was delivered to.
    pub email: String,
    /// Contact title.
    pub title: String,
    /// Company the contact belongs to.
    pub company: String,
    /// Delivery status.
    pub status: SendStatus,
}

impl SentEmail {
    /// Records a successful send of a message to `email` for `contact`.
    pub fn sent(contact: &Contact, email: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            recruiter_name: contact.name.clone(),
            email: email.into(),
            title: contact.title.clone(),
            company: company.into(),
            status: SendStatus::Sent,
        }
    }
}

/// Column order of the results table.
pub const RESULT_COLUMNS: [&str; 5] = ["recruiter_name", "email", "title", "company", "status"];
