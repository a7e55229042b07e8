//! Typed facade over [`RecordStore`]
//!
//! View-models never touch raw JSON rows; this wrapper serializes models in
//! and out and pins down the filters and orderings each screen relies on.

use crate::error::GatewayError;
use crate::gateway::{Filter, Order, RecordStore};
use crate::models::{collections, Comment, MeasurementEntry, Post, Role, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Fields for a user row created by admin invitation.
#[derive(Debug, Serialize)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub credential: String,
    pub role: Role,
}

/// A validated measurement snapshot ready to persist.
#[derive(Debug, Clone, Serialize)]
pub struct NewMeasurement {
    pub owner_id: Uuid,
    pub height: f64,
    pub weight: f64,
    pub arm: f64,
    pub legs: f64,
    pub waist: f64,
    pub abdomen: f64,
    pub calf: f64,
    pub back: f64,
    pub torso: f64,
}

#[derive(Debug, Serialize)]
pub struct NewPost {
    pub author_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NewComment {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|e| GatewayError::RemoteRejection {
        status: 200,
        message: format!("unexpected row shape: {e}"),
    })
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, GatewayError> {
    rows.into_iter().map(decode).collect()
}

fn encode<T: Serialize>(record: &T) -> Result<Value, GatewayError> {
    serde_json::to_value(record).map_err(|e| GatewayError::RemoteRejection {
        status: 200,
        message: format!("unencodable record: {e}"),
    })
}

/// Thin typed wrapper around the record store shared by all view-models.
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn RecordStore>,
}

impl Records {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Look up the user matching a username + credential pair. `None` means
    /// the pair does not match any row; the caller maps that to an
    /// authentication error.
    pub async fn find_user_by_login(
        &self,
        username: &str,
        credential: &str,
    ) -> Result<Option<User>, GatewayError> {
        let rows = self
            .store
            .select(
                collections::USERS,
                &[
                    Filter::eq("username", username),
                    Filter::eq("credential", credential),
                ],
                None,
            )
            .await?;
        Ok(rows.into_iter().next().map(decode).transpose()?)
    }

    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, GatewayError> {
        let rows = self
            .store
            .select(collections::USERS, &[Filter::eq("username", username)], None)
            .await?;
        Ok(rows.into_iter().next().map(decode).transpose()?)
    }

    /// All user rows, used to resolve author ids to usernames in the feed.
    pub async fn all_users(&self) -> Result<Vec<User>, GatewayError> {
        let rows = self.store.select(collections::USERS, &[], None).await?;
        decode_rows(rows)
    }

    pub async fn insert_user(&self, user: NewUser) -> Result<User, GatewayError> {
        let row = self
            .store
            .insert(collections::USERS, encode(&user)?)
            .await?;
        decode(row)
    }

    /// Patch display name and username only; credential changes go through
    /// [`Records::change_credential`].
    pub async fn update_profile_fields(
        &self,
        user_id: Uuid,
        display_name: &str,
        username: &str,
    ) -> Result<User, GatewayError> {
        let patch = serde_json::json!({
            "display_name": display_name,
            "username": username,
        });
        let row = self
            .store
            .update(collections::USERS, user_id, patch)
            .await?;
        decode(row)
    }

    pub async fn change_credential(
        &self,
        user_id: Uuid,
        new_credential: &str,
    ) -> Result<(), GatewayError> {
        self.store.update_credential(user_id, new_credential).await
    }

    /// Measurement history for one owner, oldest first.
    pub async fn measurements_for(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<MeasurementEntry>, GatewayError> {
        let rows = self
            .store
            .select(
                collections::MEASUREMENTS,
                &[Filter::eq("owner_id", owner_id)],
                Some(Order::asc("created_at")),
            )
            .await?;
        decode_rows(rows)
    }

    pub async fn insert_measurement(
        &self,
        entry: NewMeasurement,
    ) -> Result<MeasurementEntry, GatewayError> {
        let row = self
            .store
            .insert(collections::MEASUREMENTS, encode(&entry)?)
            .await?;
        decode(row)
    }

    /// Feed posts, newest first.
    pub async fn posts(&self) -> Result<Vec<Post>, GatewayError> {
        let rows = self
            .store
            .select(collections::POSTS, &[], Some(Order::desc("created_at")))
            .await?;
        decode_rows(rows)
    }

    /// All comments, oldest first; the feed groups them by post locally.
    pub async fn comments(&self) -> Result<Vec<Comment>, GatewayError> {
        let rows = self
            .store
            .select(collections::COMMENTS, &[], Some(Order::asc("created_at")))
            .await?;
        decode_rows(rows)
    }

    pub async fn insert_post(&self, post: NewPost) -> Result<Post, GatewayError> {
        let row = self.store.insert(collections::POSTS, encode(&post)?).await?;
        decode(row)
    }

    pub async fn insert_comment(&self, comment: NewComment) -> Result<Comment, GatewayError> {
        let row = self
            .store
            .insert(collections::COMMENTS, encode(&comment)?)
            .await?;
        decode(row)
    }
}
