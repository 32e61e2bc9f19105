//! Email transport trait definition.
//!
//! This module defines the [`EmailTransport`] trait which abstracts over the
//! outbound mail backend. The campaign only ever talks to this trait, so tests
//! can substitute a fake relay.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type alias for email transport operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur while delivering a message.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Authentication failed or credentials were rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Network, DNS or TLS error.
    #[error("connection error: {0}")]
    Connection(String),

    /// The relay refused the message.
    #[error("relay rejected message: {0}")]
    Rejected(String),

    /// Invalid request or parameters (bad address, unbuildable message).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// A display-name and address pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Display name, if any.
    pub name: Option<String>,
    /// Bare mail address.
    pub email: String,
}

impl Address {
    /// Creates an address without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            name: None,
            email: email.into(),
        }
    }

    /// Creates an address with a display name.
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
        }
    }

    /// Formats as `Name <email>` or just `email`.
    pub fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

/// An email to be sent to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Sender address.
    pub from: Address,
    /// Recipient address.
    pub to: Address,
    /// Email subject.
    pub subject: String,
    /// HTML body.
    pub body_html: String,
    /// Attachment data.
    pub attachments: Vec<OutgoingAttachment>,
}

/// An attachment to be sent with an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingAttachment {
    /// Filename for the attachment.
    pub filename: String,
    /// MIME content type.
    pub content_type: String,
    /// Raw attachment data.
    pub data: Vec<u8>,
}

/// Trait for outbound mail transports.
///
/// Implementations open whatever connection they need, deliver exactly one
/// message, and release the connection before returning, whether or not the
/// delivery succeeded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Delivers `email`, returning the relay's response text on success.
    async fn send_email(&self, email: &OutgoingEmail) -> Result<String>;
}
