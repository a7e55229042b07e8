//! Admin invitation flow
//!
//! Creates the user record first, then attempts the invitation email. A
//! failed email never rolls back the already-created user; it degrades to a
//! partial-success warning ("user created, email failed").

use crate::error::{AppError, PartialSuccess, Result, ValidationError};
use crate::forms::validate_email;
use crate::gateway::records::NewUser;
use crate::gateway::Records;
use crate::models::{Role, User};
use crate::services::EmailService;
use crate::session::Session;
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use std::sync::Arc;
use tracing::{info, warn};

const GENERATED_CREDENTIAL_LEN: usize = 10;

/// Delivery seam for the invitation email, so the flow can be exercised
/// without SMTP.
#[async_trait]
pub trait InviteMailer: Send + Sync {
    async fn send_invitation(
        &self,
        recipient: &str,
        username: &str,
        credential: &str,
    ) -> Result<()>;
}

#[async_trait]
impl InviteMailer for EmailService {
    async fn send_invitation(
        &self,
        recipient: &str,
        username: &str,
        credential: &str,
    ) -> Result<()> {
        EmailService::send_invitation(self, recipient, username, credential).await
    }
}

fn generate_credential() -> String {
    let mut rng = thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(GENERATED_CREDENTIAL_LEN)
        .collect()
}

/// What the invitation produced: the persisted user plus the per-phase
/// report and a user-facing message.
#[derive(Debug)]
pub struct InviteOutcome {
    pub user: User,
    pub report: PartialSuccess,
    pub message: String,
}

pub struct InviteService {
    session: Arc<Session>,
    records: Records,
    mailer: Arc<dyn InviteMailer>,
}

impl InviteService {
    pub fn new(session: Arc<Session>, records: Records, mailer: Arc<dyn InviteMailer>) -> Self {
        Self {
            session,
            records,
            mailer,
        }
    }

    /// Invite a new member by email address. The generated username and
    /// display name are the lower-cased local part of the address; the
    /// one-time credential is generated.
    pub async fn invite(&self, email: &str) -> Result<InviteOutcome> {
        let inviter = self
            .session
            .current_user()
            .ok_or_else(|| AppError::Forbidden("sign in required".to_string()))?;
        if !inviter.role.is_admin() {
            return Err(AppError::Forbidden(
                "only admins can invite users".to_string(),
            ));
        }

        let email = email.trim();
        if !validate_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        // Safe after the shape check above; every valid address has an '@'.
        let local_part = email.split('@').next().unwrap_or_default();
        let username = local_part.to_lowercase();
        let credential = generate_credential();

        let user = self
            .records
            .insert_user(NewUser {
                username: username.clone(),
                display_name: username.clone(),
                email: email.to_string(),
                credential: credential.clone(),
                role: Role::Member,
            })
            .await?;
        info!(%username, invited_by = %inviter.username, "user created");

        let email_ok = match self
            .mailer
            .send_invitation(email, &username, &credential)
            .await
        {
            Ok(()) => true,
            Err(err) => {
                warn!(%email, "invitation email failed: {err}");
                false
            }
        };

        let report = PartialSuccess {
            email_ok: Some(email_ok),
            ..Default::default()
        };
        let message = if email_ok {
            format!("user created for {email}")
        } else {
            "user created, email failed".to_string()
        };

        Ok(InviteOutcome {
            user,
            report,
            message,
        })
    }
}
