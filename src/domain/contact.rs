//! Contact domain types.
//!
//! Represents one row of the contact table a campaign is run against.

use serde::{Deserialize, Serialize};

/// A recruiter contact read from the contact table.
///
/// Only `name` and `title` are read; any other columns are ignored. A blank
/// cell deserializes to an empty string rather than failing the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Full display name, e.g. "Jane Doe".
    #[serde(default)]
    pub name: String,
    /// Job title, e.g. "Technical Recruiter".
    #[serde(default)]
    pub title: String,
}

impl Contact {
    /// Creates a new contact.
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
        }
    }

    /// Returns the first whitespace-separated token of the name, or "" if none.
    pub fn first_name(&self) -> &str {
        first_name(&self.name)
    }
}

/// Returns the first whitespace-separated token of `name`, or "" if none.
pub fn first_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}
