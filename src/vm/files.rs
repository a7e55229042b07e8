//! File listing view-model
//!
//! Admin path: resolve a free-text target username to a storage namespace
//! and upload one file under a timestamp-prefixed key. Member path: list the
//! caller's own namespace and hand out short-lived signed URLs for
//! downloads. Listing and retrieval are namespace-scoped to the caller.

use crate::config::StorageConfig;
use crate::error::{AppError, Result, ValidationError};
use crate::gateway::{FileMeta, Records};
use crate::session::Session;
use crate::vm::LoadState;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Extensions accepted by the upload form. Not enforced by the object store
/// itself.
const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "xlsx", "xls"];

const NO_FILES_MESSAGE: &str = "no files available";

fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub struct FileBrowser {
    session: Arc<Session>,
    records: Records,
    config: StorageConfig,
    state: LoadState<Vec<FileMeta>>,
    message: Option<String>,
}

impl FileBrowser {
    pub fn new(session: Arc<Session>, records: Records, config: StorageConfig) -> Self {
        Self {
            session,
            records,
            config,
            state: LoadState::Idle,
            message: None,
        }
    }

    pub fn state(&self) -> &LoadState<Vec<FileMeta>> {
        &self.state
    }

    /// Status line for the listing ("no files available" on an empty
    /// namespace). Not an error state.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Admin upload on behalf of a target username. The free-text username
    /// is trimmed and lower-cased into a namespace; whether it must exist as
    /// a user row is the `verify_upload_target` policy. Returns the stored
    /// object key.
    pub async fn admin_upload(
        &self,
        target_username: &str,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| AppError::Forbidden("sign in required".to_string()))?;
        if !user.role.is_admin() {
            return Err(AppError::Forbidden(
                "only admins can upload files".to_string(),
            ));
        }

        let namespace = target_username.trim().to_lowercase();
        if namespace.is_empty() {
            return Err(ValidationError::EmptyRequiredField("username").into());
        }
        if original_name.trim().is_empty() {
            return Err(ValidationError::EmptyRequiredField("file").into());
        }

        match extension_of(original_name) {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
            other => {
                return Err(ValidationError::UnsupportedFileType(
                    other.unwrap_or_else(|| "none".to_string()),
                )
                .into())
            }
        }

        if self.config.verify_upload_target
            && self
                .records
                .find_user_by_username(&namespace)
                .await?
                .is_none()
        {
            return Err(AppError::NotFound(format!(
                "no user named '{namespace}'"
            )));
        }

        let path = format!(
            "{}/{}_{}",
            namespace,
            Utc::now().timestamp_millis(),
            original_name.trim()
        );
        self.records
            .store()
            .upload(&self.config.bucket, &path, bytes)
            .await?;

        info!(%namespace, %path, "file uploaded");
        Ok(path)
    }

    /// List the session user's own namespace. An empty listing is a
    /// successful state with a status message, not an error.
    pub async fn load_own(&mut self) {
        let Some(user) = self.session.current_user() else {
            self.state = LoadState::Failed("sign in to see your files".to_string());
            return;
        };

        self.state = LoadState::Loading;
        self.message = None;

        let prefix = format!("{}/", user.namespace());
        match self.records.store().list(&self.config.bucket, &prefix).await {
            Ok(files) => {
                if files.is_empty() {
                    self.message = Some(NO_FILES_MESSAGE.to_string());
                }
                self.state = LoadState::Ready(files);
            }
            Err(err) => {
                warn!(%prefix, "file listing failed: {err}");
                self.state = LoadState::Failed("could not fetch your files".to_string());
            }
        }
    }

    /// Request a time-limited signed URL for one of the caller's own files.
    /// The caller opens the URL; nothing is cached or re-listed afterwards.
    pub async fn download_url(&self, file_name: &str) -> Result<String> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| AppError::Forbidden("sign in required".to_string()))?;

        let path = format!("{}/{}", user.namespace(), file_name);
        let url = self
            .records
            .store()
            .signed_url(&self.config.bucket, &path, self.config.signed_url_ttl_secs)
            .await?;
        Ok(url)
    }
}
