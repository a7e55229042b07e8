//! Data models for the fitclub client core
//!
//! These mirror the collections on the remote record store:
//! - `users`: identities with a role and credential reference
//! - `measurements`: append-only body-measurement snapshots, one owner each
//! - `posts`: admin-authored feed entries, immutable after creation
//! - `comments`: append-only, attached to exactly one post

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Collection names on the remote store
pub mod collections {
    pub const USERS: &str = "users";
    pub const MEASUREMENTS: &str = "measurements";
    pub const POSTS: &str = "posts";
    pub const COMMENTS: &str = "comments";
}

/// User role on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A row in the `users` collection.
///
/// Users are created by admin invitation, mutated by self-service profile
/// edits, and never deleted by the application. The credential is stored by
/// the remote service; the client only forwards it on login and on the
/// privileged credential-change operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Storage namespace for this user's files (lower-cased username).
    pub fn namespace(&self) -> String {
        self.username.trim().to_lowercase()
    }
}

/// A timestamped snapshot of up to nine body metrics, immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub arm: Option<f64>,
    pub legs: Option<f64>,
    pub waist: Option<f64>,
    pub abdomen: Option<f64>,
    pub calf: Option<f64>,
    pub back: Option<f64>,
    pub torso: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// The nine tracked metrics, used to select a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Height,
    Weight,
    Arm,
    Legs,
    Waist,
    Abdomen,
    Calf,
    Back,
    Torso,
}

impl MeasurementEntry {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Height => self.height,
            Metric::Weight => self.weight,
            Metric::Arm => self.arm,
            Metric::Legs => self.legs,
            Metric::Waist => self.waist,
            Metric::Abdomen => self.abdomen,
            Metric::Calf => self.calf,
            Metric::Back => self.back,
            Metric::Torso => self.torso,
        }
    }
}

/// A row in the `posts` collection. Created only by admins; no edit or
/// delete path exists in the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A row in the `comments` collection, attached to one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
