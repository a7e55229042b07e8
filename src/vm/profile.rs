//! Profile editor view-model
//!
//! Holds a local draft distinct from the committed session user. Saving is
//! an explicit two-phase operation: the profile-field patch and the
//! privileged credential change run as separate remote calls, each reported
//! independently. A successful field patch propagates into the session so
//! every open view reflects it without a reload.

use crate::error::{AppError, PartialSuccess, Result, ValidationError};
use crate::forms::ProfileDraft;
use crate::gateway::Records;
use crate::session::{Session, SessionPatch};
use std::sync::Arc;
use tracing::{info, warn};

/// What happened when the draft was saved.
#[derive(Debug, Clone)]
pub struct SaveReport {
    pub outcome: PartialSuccess,
    /// Inline messages for phases that failed.
    pub messages: Vec<String>,
    /// Whether the edit form closed: at least one requested change succeeded
    /// and none failed.
    pub closed: bool,
}

pub struct ProfileEditor {
    session: Arc<Session>,
    records: Records,
    draft: ProfileDraft,
    open: bool,
}

impl ProfileEditor {
    pub fn new(session: Arc<Session>, records: Records) -> Self {
        Self {
            session,
            records,
            draft: ProfileDraft::default(),
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }

    /// Open the form with a draft seeded from the committed session user.
    pub fn begin_edit(&mut self) -> Result<()> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| AppError::Forbidden("sign in required".to_string()))?;
        self.draft = ProfileDraft {
            display_name: user.display_name,
            username: user.username,
            ..Default::default()
        };
        self.open = true;
        Ok(())
    }

    /// Discard the draft and close the form.
    pub fn cancel(&mut self) {
        self.draft = ProfileDraft::default();
        self.open = false;
    }

    /// Validate and persist the draft.
    ///
    /// Phase 1 patches display name and username; phase 2 issues the
    /// credential change. Both phases are attempted when requested,
    /// regardless of the other's outcome, and reported separately. A phase-1
    /// success is merged into the session before phase 2 runs.
    pub async fn save(&mut self) -> Result<SaveReport> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| AppError::Forbidden("sign in required".to_string()))?;

        self.draft.validate()?;

        let fields_changed = self.draft.display_name != user.display_name
            || self.draft.username != user.username;
        let credential_requested = self.draft.wants_credential_change();

        if !fields_changed && !credential_requested {
            return Err(ValidationError::NoChangesDetected.into());
        }

        let mut outcome = PartialSuccess::default();
        let mut messages = Vec::new();

        if fields_changed {
            match self
                .records
                .update_profile_fields(user.id, &self.draft.display_name, &self.draft.username)
                .await
            {
                Ok(updated) => {
                    outcome.profile_ok = Some(true);
                    self.session.update_current_user(SessionPatch {
                        display_name: Some(updated.display_name),
                        username: Some(updated.username),
                    });
                    info!(user = %user.id, "profile fields updated");
                }
                Err(err) => {
                    warn!(user = %user.id, "profile patch failed: {err}");
                    outcome.profile_ok = Some(false);
                    messages.push(format!("could not save profile: {err}"));
                }
            }
        }

        if credential_requested {
            match self
                .records
                .change_credential(user.id, &self.draft.new_credential)
                .await
            {
                Ok(()) => {
                    outcome.credential_ok = Some(true);
                    info!(user = %user.id, "credential updated");
                }
                Err(err) => {
                    warn!(user = %user.id, "credential update failed: {err}");
                    outcome.credential_ok = Some(false);
                    messages.push(format!("could not change password: {err}"));
                }
            }
        }

        let closed = outcome.all_succeeded();
        if closed {
            self.draft.new_credential.clear();
            self.draft.confirm_credential.clear();
            self.open = false;
        }

        Ok(SaveReport {
            outcome,
            messages,
            closed,
        })
    }
}
