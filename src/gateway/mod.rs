//! Remote record gateway
//!
//! Everything the application persists lives behind the [`RecordStore`]
//! trait: collection-style select/insert/update against the hosted record
//! store, plus file operations against its object storage. All operations
//! are single-shot and non-retrying; no transactional guarantee spans
//! multiple calls.

pub mod http;
pub mod records;

use crate::error::GatewayError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub use http::HttpGateway;
pub use records::Records;

/// Equality predicate on one column. The only filter shape the application
/// needs; richer predicates stay with the hosted store.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self {
            column: column.into(),
            value: value.to_string(),
        }
    }
}

/// Ordering on one column
#[derive(Debug, Clone)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Metadata for one stored object, as reported by the object store listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Collection and file operations against the hosted backend.
///
/// Rows cross this boundary as JSON values; the [`Records`] facade maps them
/// to typed models. Implementations must not retry and must normalize all
/// failures into [`GatewayError`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch all rows of `collection` matching every filter, optionally
    /// ordered.
    async fn select(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<Order>,
    ) -> Result<Vec<Value>, GatewayError>;

    /// Insert one row and return it as stored (server-assigned id and
    /// timestamps included).
    async fn insert(&self, collection: &str, record: Value) -> Result<Value, GatewayError>;

    /// Patch one row by id and return the updated row.
    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<Value, GatewayError>;

    /// Privileged credential change for one user. Kept separate from
    /// [`RecordStore::update`] because the hosted service treats credential
    /// mutation as its own operation with its own failure modes.
    async fn update_credential(
        &self,
        user_id: Uuid,
        new_credential: &str,
    ) -> Result<(), GatewayError>;

    /// Upload one object. The key convention is
    /// `{namespace}/{unix_ms}_{original_name}`; callers build the path.
    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<(), GatewayError>;

    /// List objects under `prefix`. An empty listing is a successful result,
    /// not an error.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<FileMeta>, GatewayError>;

    /// Issue a time-limited signed URL granting read access to one object.
    async fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_secs: u64,
    ) -> Result<String, GatewayError>;
}
