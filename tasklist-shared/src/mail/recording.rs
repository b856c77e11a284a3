/// In-memory mailer
///
/// Used by tests to read back confirmation and reset links, and by the server
/// when no SMTP relay is configured (messages are logged instead of sent).

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

use super::{Email, MailError, Mailer};

#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message sent so far, oldest first
    pub fn sent(&self) -> Vec<Email> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, body = %email.body, "Email recorded");

        self.sent
            .lock()
            .map_err(|_| MailError::Transport("recording mailer poisoned".to_string()))?
            .push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::{confirmation_email, password_reset_email};

    #[tokio::test]
    async fn test_records_in_order() {
        let mailer = RecordingMailer::new();
        mailer.send(confirmation_email("a@example.com", "l1")).await.unwrap();
        mailer.send(password_reset_email("b@example.com", "l2")).await.unwrap();
        mailer.send(password_reset_email("a@example.com", "l3")).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].to, "b@example.com");
        assert!(sent[2].body.contains("l3"));
    }
}
