//! Email transport implementations.
//!
//! This module contains the [`EmailTransport`] trait and the SMTP
//! implementation used for real sends:
//!
//! - [`SmtpProvider`] - authenticated SMTP relay via `lettre`
//!
//! # Example
//!
//! ```ignore
//! use outreach::providers::email::{Address, EmailTransport, OutgoingEmail};
//!
//! async fn send_one(transport: &dyn EmailTransport) {
//!     let email = OutgoingEmail {
//!         from: Address::new("me@example.com"),
//!         to: Address::new("jane@stripe.com"),
//!         subject: "Hello".to_string(),
//!         body_html: "<p>Hi</p>".to_string(),
//!         attachments: vec![],
//!     };
//!     transport.send_email(&email).await.expect("send failed");
//! }
//! ```

mod smtp;
mod traits;

pub use smtp::{SmtpCredentials, SmtpProvider};
#[cfg(test)]
pub use traits::MockEmailTransport;
pub use traits::{
    Address, EmailTransport, OutgoingAttachment, OutgoingEmail, ProviderError, Result,
};
