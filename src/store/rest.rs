//! # REST Relationship Store
//!
//! A [`RelationshipStore`](super::RelationshipStore) over PostgREST
//! conventions, matching the hosted relational backends the client syncs
//! against:
//!
//! - `apikey` header plus bearer authorization on every request
//! - row filters as `?column=eq.value` query parameters
//! - inserts via `POST`, duplicate keys answered with HTTP 409
//! - deletes via `DELETE` with `Prefer: return=representation`, so a
//!   zero-row match is detectable
//! - counts via `HEAD` with `Prefer: count=exact`, read from the
//!   `Content-Range` response header
//!
//! All HTTP failures are mapped onto [`StoreError`] variants here; nothing
//! above this layer looks at status codes or response text.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::StoreError;
use crate::types::{ObjectId, RelationshipKey, RelationshipKind, UserId};

use super::RelationshipStore;

/// Connection settings for a PostgREST endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Base URL of the REST schema root, e.g. `https://db.example.com/rest/v1`.
    pub base_url: String,
    /// Project API key, sent as the `apikey` header.
    pub api_key: String,
    /// Per-session access token for bearer authorization. Falls back to
    /// the API key when absent (anonymous role).
    pub bearer_token: Option<String>,
}

/// Relationship store speaking PostgREST over HTTP.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    config: RestConfig,
}

impl RestStore {
    /// Create a store with a fresh HTTP client.
    pub fn new(config: RestConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn table_url(&self, kind: RelationshipKind) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), kind.table())
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let token = self
            .config
            .bearer_token
            .as_deref()
            .unwrap_or(&self.config.api_key);
        req.header("apikey", &self.config.api_key).bearer_auth(token)
    }

    fn key_filter(key: &RelationshipKey) -> [(&'static str, String); 2] {
        [
            (key.kind.subject_column(), format!("eq.{}", key.subject)),
            (key.kind.object_column(), format!("eq.{}", key.object)),
        ]
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, StoreError> {
        let resp = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            Err(classify_status(status))
        }
    }

    async fn count_with_filter(
        &self,
        kind: RelationshipKind,
        column: &'static str,
        value: String,
    ) -> Result<u64, StoreError> {
        let req = self
            .client
            .head(self.table_url(kind))
            .query(&[(column, value)])
            .header("Prefer", "count=exact");
        let resp = self.send(req).await?;
        let range = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StoreError::malformed("missing Content-Range header"))?;
        parse_content_range(range)
    }
}

#[async_trait]
impl RelationshipStore for RestStore {
    async fn exists(&self, key: &RelationshipKey) -> Result<bool, StoreError> {
        let req = self
            .client
            .get(self.table_url(key.kind))
            .query(&Self::key_filter(key))
            .query(&[("select", key.kind.object_column()), ("limit", "1")]);
        let rows: Vec<serde_json::Value> = self
            .send(req)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::malformed(e.to_string()))?;
        Ok(!rows.is_empty())
    }

    async fn insert_edge(&self, key: &RelationshipKey) -> Result<(), StoreError> {
        let mut row = serde_json::Map::new();
        row.insert(
            key.kind.subject_column().to_string(),
            serde_json::json!(key.subject.0),
        );
        row.insert(
            key.kind.object_column().to_string(),
            serde_json::json!(key.object.0),
        );
        let body = serde_json::Value::Array(vec![serde_json::Value::Object(row)]);

        let req = self
            .client
            .post(self.table_url(key.kind))
            .header("Prefer", "return=minimal")
            .json(&body);
        self.send(req).await?;
        Ok(())
    }

    async fn delete_edge(&self, key: &RelationshipKey) -> Result<(), StoreError> {
        let req = self
            .client
            .delete(self.table_url(key.kind))
            .query(&Self::key_filter(key))
            .header("Prefer", "return=representation");
        let deleted: Vec<serde_json::Value> = self
            .send(req)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::malformed(e.to_string()))?;
        if deleted.is_empty() {
            Err(StoreError::NotFound)
        } else {
            Ok(())
        }
    }

    async fn count_by_object(
        &self,
        object: ObjectId,
        kind: RelationshipKind,
    ) -> Result<u64, StoreError> {
        self.count_with_filter(kind, kind.object_column(), format!("eq.{object}"))
            .await
    }

    async fn count_by_subject(
        &self,
        subject: UserId,
        kind: RelationshipKind,
    ) -> Result<u64, StoreError> {
        self.count_with_filter(kind, kind.subject_column(), format!("eq.{subject}"))
            .await
    }

    async fn list_subject_edges(
        &self,
        subject: UserId,
        kind: RelationshipKind,
    ) -> Result<HashSet<ObjectId>, StoreError> {
        let req = self
            .client
            .get(self.table_url(kind))
            .query(&[
                (kind.subject_column(), format!("eq.{subject}")),
                ("select", kind.object_column().to_string()),
            ]);
        let rows: Vec<serde_json::Value> = self
            .send(req)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::malformed(e.to_string()))?;

        let mut objects = HashSet::with_capacity(rows.len());
        for row in rows {
            let id = row
                .get(kind.object_column())
                .and_then(|v| v.as_str())
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(|| {
                    StoreError::malformed(format!("row missing {} column", kind.object_column()))
                })?;
            objects.insert(ObjectId(id));
        }
        Ok(objects)
    }
}

/// Map an unsuccessful HTTP status onto the store taxonomy.
fn classify_status(status: StatusCode) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::PermissionDenied,
        StatusCode::CONFLICT => StoreError::Conflict,
        s if s.is_server_error() => StoreError::unavailable(format!("store answered {s}")),
        s => StoreError::malformed(format!("unexpected status {s}")),
    }
}

/// Extract the total row count from a `Content-Range` value such as
/// `0-24/25` or `*/0`.
fn parse_content_range(value: &str) -> Result<u64, StoreError> {
    value
        .rsplit('/')
        .next()
        .and_then(|total| total.parse::<u64>().ok())
        .ok_or_else(|| StoreError::malformed(format!("unparseable Content-Range: {value}")))
}
