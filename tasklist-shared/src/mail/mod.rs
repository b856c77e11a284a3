/// Outbound email
///
/// Account flows only ever send two messages: the registration confirmation
/// link and the password reset link. Both go through the [`Mailer`] trait so
/// the transport can be swapped:
///
/// - [`smtp::SmtpMailer`]: lettre async SMTP over implicit TLS
/// - [`recording::RecordingMailer`]: keeps messages in memory and logs them
///
/// # Example
///
/// ```no_run
/// use tasklist_shared::mail::{confirmation_email, recording::RecordingMailer, Mailer};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = RecordingMailer::new();
/// mailer
///     .send(confirmation_email("alice@example.com", "http://localhost:8000/auth/confirm?token=t"))
///     .await?;
/// # Ok(())
/// # }
/// ```

pub mod recording;
pub mod smtp;

use async_trait::async_trait;
use thiserror::Error;

/// Mail delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    /// Sender or recipient is not a valid mailbox
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    Build(String),

    /// Transport setup or delivery failed
    #[error("Failed to send email: {0}")]
    Transport(String),
}

/// A plain-text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Email transport
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), MailError>;
}

/// Registration confirmation message
pub fn confirmation_email(to: &str, link: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Confirm your email".to_string(),
        body: format!("Click the link to confirm your email: {}", link),
    }
}

/// Password reset message
pub fn password_reset_email(to: &str, link: &str) -> Email {
    Email {
        to: to.to_string(),
        subject: "Password Reset Request".to_string(),
        body: format!(
            "Click the link to reset your password: {}\n\nThis link will expire in 15 minutes.",
            link
        ),
    }
}
