//! Outbound mail

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Mail delivery failed: {0}")]
pub struct MailError(pub String);

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_reset_code(
        &self,
        to: &str,
        firstname: &str,
        code: &str,
        ttl_minutes: i64,
    ) -> Result<(), MailError>;
}

/// Writes outgoing mail to the log instead of a mail server.
///
/// The code itself is only emitted at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_reset_code(
        &self,
        to: &str,
        firstname: &str,
        code: &str,
        ttl_minutes: i64,
    ) -> Result<(), MailError> {
        tracing::info!(to, ttl_minutes, "Password reset email queued");
        tracing::debug!(to, firstname, code, "Password reset email body");
        Ok(())
    }
}
