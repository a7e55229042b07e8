//! HTTP implementation of [`RecordStore`]
//!
//! Speaks the hosted backend's REST conventions: collection operations under
//! `/rest/v1/{collection}`, object storage under `/storage/v1/object/...`.
//! Responses are normalized into `GatewayError`; non-2xx statuses become
//! `RemoteRejection` with the body's message when one is present.

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::{FileMeta, Filter, Order, RecordStore};
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

/// Client for the hosted record store and its object storage.
pub struct HttpGateway {
    http: Client,
    base_url: String,
    api_key: String,
}

impl HttpGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .build()
            .map_err(|e| GatewayError::NetworkFailure(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn rest_url(&self, collection: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection)
    }

    fn storage_url(&self, tail: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, tail)
    }

    fn encode_path(path: &str) -> String {
        path.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    /// Turn a non-success response into `RemoteRejection`, preferring the
    /// remote error message when the body carries one.
    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or(body);

        Err(GatewayError::RemoteRejection {
            status: status.as_u16(),
            message,
        })
    }

    /// Writes ask the store to return the stored representation; the store
    /// answers with a one-element array.
    async fn single_row(response: Response) -> Result<Value, GatewayError> {
        let mut rows: Vec<Value> = response.json().await?;
        if rows.is_empty() {
            return Err(GatewayError::RemoteRejection {
                status: StatusCode::OK.as_u16(),
                message: "write returned no row".to_string(),
            });
        }
        Ok(rows.remove(0))
    }
}

#[async_trait]
impl RecordStore for HttpGateway {
    async fn select(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<Order>,
    ) -> Result<Vec<Value>, GatewayError> {
        let mut query: Vec<(String, String)> = vec![("select".into(), "*".into())];
        for filter in filters {
            query.push((filter.column.clone(), format!("eq.{}", filter.value)));
        }
        if let Some(order) = order {
            let direction = if order.ascending { "asc" } else { "desc" };
            query.push(("order".into(), format!("{}.{}", order.column, direction)));
        }

        debug!(collection, filters = filters.len(), "select");
        let response = self
            .authed(self.http.get(self.rest_url(collection)).query(&query))
            .send()
            .await?;
        let rows = Self::check(response).await?.json().await?;
        Ok(rows)
    }

    async fn insert(&self, collection: &str, record: Value) -> Result<Value, GatewayError> {
        debug!(collection, "insert");
        let response = self
            .authed(self.http.post(self.rest_url(collection)))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        Self::single_row(Self::check(response).await?).await
    }

    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<Value, GatewayError> {
        debug!(collection, %id, "update");
        let response = self
            .authed(
                self.http
                    .patch(self.rest_url(collection))
                    .query(&[("id", format!("eq.{id}"))]),
            )
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        Self::single_row(Self::check(response).await?).await
    }

    async fn update_credential(
        &self,
        user_id: Uuid,
        new_credential: &str,
    ) -> Result<(), GatewayError> {
        debug!(%user_id, "credential update");
        let response = self
            .authed(
                self.http
                    .patch(self.rest_url("users"))
                    .query(&[("id", format!("eq.{user_id}"))]),
            )
            .json(&json!({ "credential": new_credential }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<(), GatewayError> {
        debug!(bucket, path, size = bytes.len(), "upload");
        let url = self.storage_url(&format!("object/{}/{}", bucket, Self::encode_path(path)));
        let response = self
            .authed(self.http.post(url))
            .header("x-upsert", "false")
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<FileMeta>, GatewayError> {
        debug!(bucket, prefix, "list objects");
        let url = self.storage_url(&format!("object/list/{bucket}"));
        let response = self
            .authed(self.http.post(url))
            .json(&json!({ "prefix": prefix, "limit": 100 }))
            .send()
            .await?;
        let files = Self::check(response).await?.json().await?;
        Ok(files)
    }

    async fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_secs: u64,
    ) -> Result<String, GatewayError> {
        debug!(bucket, path, ttl_secs, "signed url");
        let url = self.storage_url(&format!(
            "object/sign/{}/{}",
            bucket,
            Self::encode_path(path)
        ));
        let response = self
            .authed(self.http.post(url))
            .json(&json!({ "expiresIn": ttl_secs }))
            .send()
            .await?;

        #[derive(serde::Deserialize)]
        struct Signed {
            #[serde(rename = "signedURL")]
            signed_url: String,
        }
        let signed: Signed = Self::check(response).await?.json().await?;

        // The store answers with a path relative to the storage root.
        Ok(format!(
            "{}/storage/v1{}",
            self.base_url,
            signed.signed_url
        ))
    }
}
