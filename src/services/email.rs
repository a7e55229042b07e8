//! Email service for invitation delivery

use crate::config::EmailSettings;
use crate::error::{AppError, Result};
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use std::sync::Arc;
use tracing::{info, warn};

/// Async email transport wrapper (SMTP or no-op)
#[derive(Clone)]
pub struct EmailService {
    transport: Option<Arc<AsyncSmtpTransport<Tokio1Executor>>>,
    from: Mailbox,
    login_base_url: String,
}

impl EmailService {
    /// Build email service from configuration
    ///
    /// If SMTP host is empty, operates in no-op mode (logs only).
    /// Useful for development and testing without email infrastructure.
    pub fn new(config: &EmailSettings) -> Result<Self> {
        let from = config
            .smtp_from
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid SMTP_FROM address: {e}")))?;

        let transport = if config.smtp_host.trim().is_empty() {
            warn!("SMTP host not configured; email service will operate in no-op mode");
            None
        } else {
            let builder = if config.use_starttls {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            }
            .map_err(|e| AppError::Internal(format!("Failed to configure SMTP transport: {e}")))?
            .port(config.smtp_port);

            let builder = if let (Some(username), Some(password)) =
                (&config.smtp_username, &config.smtp_password)
            {
                builder.credentials(Credentials::new(username.to_string(), password.to_string()))
            } else {
                builder
            };

            Some(Arc::new(builder.build()))
        };

        Ok(Self {
            transport,
            from,
            login_base_url: config.login_base_url.clone(),
        })
    }

    /// Check if SMTP transport is enabled
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send the invitation email: generated username, one-time credential,
    /// and a login link.
    pub async fn send_invitation(
        &self,
        recipient: &str,
        username: &str,
        credential: &str,
    ) -> Result<()> {
        let subject = "Your FitClub account";
        let body = format!(
            "Welcome to FitClub!\n\n\
             An account has been created for you.\n\n\
             Username: {username}\n\
             Temporary password: {credential}\n\n\
             Sign in here and change your password from your profile:\n{}/login\n",
            self.login_base_url.trim_end_matches('/'),
        );
        self.send_mail(recipient, subject, &body).await
    }

    async fn send_mail(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let Some(transport) = &self.transport else {
            info!(%recipient, %subject, "email no-op mode; skipping delivery");
            return Ok(());
        };

        let to = recipient
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("failed to build email: {e}")))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Internal(format!("failed to send email: {e}")))?;

        info!(%recipient, "invitation email sent");
        Ok(())
    }
}
