//! SMTP transport implementation.
//!
//! Delivers messages through an authenticated relay using `lettre`, with
//! STARTTLS or implicit TLS.
//!
//! # Connection lifecycle
//!
//! The transport is built without a connection pool, so every call to
//! [`EmailTransport::send_email`] opens a fresh session (connect, TLS,
//! AUTH), sends one message and closes the session. The session is dropped
//! on every exit path, including errors.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{Address, EmailTransport, OutgoingEmail, ProviderError, Result};
use crate::config::{RelaySettings, TlsMode};

/// Login for the relay. The password is redacted from debug output.
#[derive(Clone)]
pub struct SmtpCredentials {
    /// Username (usually the sender address).
    pub username: String,
    /// Password or app-specific password.
    pub password: String,
}

impl SmtpCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// SMTP email transport.
///
/// # Example
///
/// ```ignore
/// use outreach::config::RelaySettings;
/// use outreach::providers::email::{SmtpCredentials, SmtpProvider};
///
/// let provider = SmtpProvider::new(
///     RelaySettings::default(),
///     SmtpCredentials::new("me@example.com", "app-password"),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SmtpProvider {
    relay: RelaySettings,
    credentials: SmtpCredentials,
}

impl SmtpProvider {
    /// Creates a provider for the given relay and login.
    pub fn new(relay: RelaySettings, credentials: SmtpCredentials) -> Self {
        Self { relay, credentials }
    }

    /// Returns the relay configuration.
    pub fn relay(&self) -> &RelaySettings {
        &self.relay
    }

    /// Builds an RFC 5322 message: an HTML part followed by any attachments.
    pub fn build_message(email: &OutgoingEmail) -> Result<Message> {
        let from = mailbox(&email.from, "from")?;
        let to = mailbox(&email.to, "to")?;

        let mut body = MultiPart::mixed().singlepart(SinglePart::html(email.body_html.clone()));
        for attachment in &email.attachments {
            let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
                ProviderError::InvalidRequest(format!(
                    "invalid content type {:?}: {}",
                    attachment.content_type, e
                ))
            })?;
            body = body.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.data.clone(), content_type),
            );
        }

        Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject)
            .multipart(body)
            .map_err(|e| ProviderError::InvalidRequest(format!("failed to build message: {}", e)))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = match self.relay.tls {
            TlsMode::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.relay.host)
            }
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.relay.host),
        }
        .map_err(|e| ProviderError::Connection(format!("SMTP relay error: {}", e)))?;

        Ok(builder
            .port(self.relay.port)
            .credentials(Credentials::new(
                self.credentials.username.clone(),
                self.credentials.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(self.relay.timeout_secs)))
            .build())
    }
}

/// Builds a mailbox from its parts. The display name is never reparsed, so
/// lettre quotes commas and other specials when it writes the header.
fn mailbox(address: &Address, role: &str) -> Result<Mailbox> {
    let email = address.email.parse::<lettre::Address>().map_err(|e| {
        ProviderError::InvalidRequest(format!("invalid {} address: {}", role, e))
    })?;
    Ok(Mailbox::new(address.name.clone(), email))
}

/// Maps a lettre SMTP error onto the provider taxonomy.
fn classify(err: lettre::transport::smtp::Error) -> ProviderError {
    let auth_rejected = err
        .status()
        .is_some_and(|code| code.to_string() == "535");

    if auth_rejected {
        ProviderError::Authentication(err.to_string())
    } else if err.is_permanent() || err.is_transient() {
        ProviderError::Rejected(err.to_string())
    } else {
        ProviderError::Connection(err.to_string())
    }
}

#[async_trait]
impl EmailTransport for SmtpProvider {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<String> {
        let message = Self::build_message(email)?;
        let mailer = self.transport()?;

        let response = mailer.send(message).await.map_err(classify)?;

        let reply = response.message().collect::<Vec<_>>().join(" ");
        tracing::debug!(code = %response.code(), reply = %reply, "Relay accepted message");
        Ok(reply)
    }
}
