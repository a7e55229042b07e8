//! Session state holder
//!
//! The single process-wide record of the authenticated user. Mutation goes
//! through `login`/`logout`/`update_current_user` only; every screen either
//! re-queries `current_user()` or subscribes for change notifications
//! instead of holding a private copy.

use crate::error::AuthError;
use crate::gateway::Records;
use crate::models::User;
use tokio::sync::watch;
use tracing::info;

/// Partial update merged into the cached session user after a successful
/// profile save, keeping every open view consistent without a round trip.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub display_name: Option<String>,
    pub username: Option<String>,
}

pub struct Session {
    current: watch::Sender<Option<User>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    /// Authenticate against the remote store. No lockout or retry policy
    /// exists; each attempt is a single round trip.
    pub async fn login(
        &self,
        records: &Records,
        username: &str,
        credential: &str,
    ) -> Result<User, AuthError> {
        let user = records
            .find_user_by_login(username, credential)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        info!(username = %user.username, role = ?user.role, "logged in");
        self.current.send_replace(Some(user.clone()));
        Ok(user)
    }

    pub fn logout(&self) {
        if let Some(user) = self.current.send_replace(None) {
            info!(username = %user.username, "logged out");
        }
    }

    /// Cloned snapshot of the session user, `None` when logged out.
    pub fn current_user(&self) -> Option<User> {
        self.current.borrow().clone()
    }

    /// Merge changed fields into the cached record. A no-op when logged out.
    pub fn update_current_user(&self, patch: SessionPatch) {
        self.current.send_if_modified(|current| {
            let Some(user) = current.as_mut() else {
                return false;
            };
            let mut changed = false;
            if let Some(display_name) = patch.display_name {
                if user.display_name != display_name {
                    user.display_name = display_name;
                    changed = true;
                }
            }
            if let Some(username) = patch.username {
                if user.username != username {
                    user.username = username;
                    changed = true;
                }
            }
            changed
        });
    }

    /// Change notifications for views that render the session user.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }
}
