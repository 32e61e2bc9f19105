//! Single-message delivery with fault containment.
//!
//! [`SenderService::send`] never fails: any fault while reading the
//! attachment, building the message or talking to the relay is logged and
//! reported as `false`, so one bad address cannot stop a campaign.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::providers::email::{
    Address, EmailTransport, OutgoingAttachment, OutgoingEmail, ProviderError,
};

/// MIME type the résumé attachment is sent as.
pub const ATTACHMENT_CONTENT_TYPE: &str = "application/pdf";

/// Sends one message at a time through an [`EmailTransport`].
#[derive(Clone)]
pub struct SenderService {
    transport: Arc<dyn EmailTransport>,
    from: Address,
    attachment_filename: String,
}

impl SenderService {
    /// Creates a sender that sends as `from` and names attachments `attachment_filename`.
    pub fn new(
        transport: Arc<dyn EmailTransport>,
        from: Address,
        attachment_filename: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            from,
            attachment_filename: attachment_filename.into(),
        }
    }

    /// Sends `body_html` to `recipient`, attaching the file at `attachment_path`
    /// if it exists.
    ///
    /// A missing attachment file is not an error: the message is sent without
    /// it. Returns whether the relay accepted the message.
    pub async fn send(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
        attachment_path: Option<&Path>,
    ) -> bool {
        match self
            .try_send(recipient, subject, body_html, attachment_path)
            .await
        {
            Ok(reply) => {
                debug!(recipient = %recipient, reply = %reply, "Message accepted");
                true
            }
            Err(e) => {
                warn!(recipient = %recipient, error = %e, "Error sending email");
                false
            }
        }
    }

    async fn try_send(
        &self,
        recipient: &str,
        subject: &str,
        body_html: &str,
        attachment_path: Option<&Path>,
    ) -> Result<String, ProviderError> {
        let mut attachments = Vec::new();
        if let Some(path) = attachment_path {
            if path.exists() {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    ProviderError::InvalidRequest(format!(
                        "failed to read attachment {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                attachments.push(OutgoingAttachment {
                    filename: self.attachment_filename.clone(),
                    content_type: ATTACHMENT_CONTENT_TYPE.to_string(),
                    data,
                });
            } else {
                info!(path = %path.display(), "Attachment not found, sending without it");
            }
        }

        let email = OutgoingEmail {
            from: self.from.clone(),
            to: Address::new(recipient),
            subject: subject.to_string(),
            body_html: body_html.to_string(),
            attachments,
        };

        self.transport.send_email(&email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::email::MockEmailTransport;
    use std::io::Write;

    fn sender(transport: MockEmailTransport) -> SenderService {
        SenderService::new(
            Arc::new(transport),
            Address::with_name("Alex Example", "alex@example.com"),
            "Resume.pdf",
        )
    }

    #[tokio::test]
    async fn missing_attachment_still_sends_without_it() {
        let mut transport = MockEmailTransport::new();
        transport
            .expect_send_email()
            .withf(|email| email.attachments.is_empty() && email.to.email == "jane@stripe.com")
            .times(1)
            .returning(|_| Ok("250 OK".to_string()));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("resume.pdf");

        let sent = sender(transport)
            .send("jane@stripe.com", "Subject", "<p>Hi</p>", Some(&missing))
            .await;
        assert!(sent);
    }

    #[tokio::test]
    async fn existing_attachment_is_attached() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let mut transport = MockEmailTransport::new();
        transport
            .expect_send_email()
            .withf(|email| {
                email.attachments.len() == 1
                    && email.attachments[0].filename == "Resume.pdf"
                    && email.attachments[0].content_type == ATTACHMENT_CONTENT_TYPE
                    && email.attachments[0].data == b"%PDF-1.4"
            })
            .times(1)
            .returning(|_| Ok("250 OK".to_string()));

        let sent = sender(transport)
            .send("jane@stripe.com", "Subject", "<p>Hi</p>", Some(file.path()))
            .await;
        assert!(sent);
    }

    #[tokio::test]
    async fn transport_fault_becomes_false() {
        let mut transport = MockEmailTransport::new();
        transport
            .expect_send_email()
            .times(1)
            .returning(|_| Err(ProviderError::Authentication("535 rejected".to_string())));

        let sent = sender(transport)
            .send("jane@stripe.com", "Subject", "<p>Hi</p>", None)
            .await;
        assert!(!sent);
    }

    #[tokio::test]
    async fn message_carries_sender_subject_and_body() {
        let mut transport = MockEmailTransport::new();
        transport
            .expect_send_email()
            .withf(|email| {
                email.from.display() == "Alex Example <alex@example.com>"
                    && email.subject == "Application"
                    && email.body_html == "<p>Hi Jane</p>"
            })
            .times(1)
            .returning(|_| Ok(String::new()));

        assert!(
            sender(transport)
                .send("jane@stripe.com", "Application", "<p>Hi Jane</p>", None)
                .await
        );
    }
}
