//! SMTP secret storage in the OS keychain.
//!
//! The relay password is kept under one keychain entry per sender, named by
//! `sender.keychain_key`, so it never has to live in the settings file.

use thiserror::Error;

use crate::config::SenderSettings;

/// Errors raised while reading or writing the SMTP secret.
#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("no SMTP secret stored under {key:?}")]
    Missing { key: String },

    #[error("keychain rejected access to {key:?}: {source}")]
    Backend {
        key: String,
        #[source]
        source: keyring::Error,
    },

    #[error("keychain task for {key:?} did not complete: {source}")]
    Task {
        key: String,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Result type for keychain operations.
pub type Result<T> = std::result::Result<T, KeychainError>;

/// Handle on the keychain entry holding one sender's SMTP secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSecret {
    key: String,
}

impl SmtpSecret {
    /// Keychain service every outreach entry is filed under.
    pub const SERVICE: &'static str = "io.outreach.cli";

    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Entry for the configured sender.
    pub fn for_sender(sender: &SenderSettings) -> Self {
        Self::new(sender.keychain_key.clone())
    }

    /// Entry name within [`Self::SERVICE`].
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stores `secret`, replacing any earlier value.
    pub async fn save(&self, secret: &str) -> Result<()> {
        let secret = secret.to_string();
        self.with_entry(move |entry| entry.set_password(&secret))
            .await
    }

    /// Reads the secret, failing with [`KeychainError::Missing`] when none is stored.
    pub async fn load(&self) -> Result<String> {
        let found = self
            .with_entry(|entry| match entry.get_password() {
                Ok(secret) => Ok(Some(secret)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(e),
            })
            .await?;
        found.ok_or_else(|| KeychainError::Missing {
            key: self.key.clone(),
        })
    }

    /// Runs a blocking keyring call against this entry off the async runtime.
    async fn with_entry<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&keyring::Entry) -> keyring::Result<T> + Send + 'static,
    {
        let key = self.key.clone();
        let account = key.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let entry = keyring::Entry::new(Self::SERVICE, &account)?;
            op(&entry)
        })
        .await;

        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(KeychainError::Backend { key, source }),
            Err(source) => Err(KeychainError::Task { key, source }),
        }
    }
}
