//! In-memory RecordStore fake for integration tests
//!
//! Simulates the hosted record store and object storage without network
//! access: collection rows live in a mutex-guarded map, writes get
//! server-assigned ids and timestamps, and per-operation call counters and
//! failure injection let tests verify which remote calls a flow issues.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use fitclub::error::GatewayError;
use fitclub::gateway::{FileMeta, Filter, Order, RecordStore, Records};
use fitclub::models::{collections, Role, User};
use fitclub::session::Session;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<HashMap<String, Vec<Value>>>,
    /// bucket -> (object key, content)
    objects: Mutex<HashMap<String, Vec<(String, Vec<u8>)>>>,
    /// Operations that should fail with a remote rejection.
    failing: Mutex<HashSet<String>>,
    /// Call counts keyed by "op" or "op:collection".
    calls: Mutex<HashMap<String, usize>>,
}

fn injected() -> GatewayError {
    GatewayError::RemoteRejection {
        status: 500,
        message: "injected failure".to_string(),
    }
}

fn field_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every call of `op` fail until `succeed_on` is called.
    pub fn fail_on(&self, op: &str) {
        self.failing.lock().unwrap().insert(op.to_string());
    }

    pub fn succeed_on(&self, op: &str) {
        self.failing.lock().unwrap().remove(op);
    }

    pub fn call_count(&self, key: &str) -> usize {
        self.calls.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    fn record_call(&self, key: String) {
        *self.calls.lock().unwrap().entry(key).or_insert(0) += 1;
    }

    fn check_failure(&self, op: &str) -> Result<(), GatewayError> {
        if self.failing.lock().unwrap().contains(op) {
            Err(injected())
        } else {
            Ok(())
        }
    }

    /// Seed a user row directly and return the typed model.
    pub fn seed_user(&self, username: &str, credential: &str, role: Role) -> User {
        let id = Uuid::new_v4();
        let row = json!({
            "id": id,
            "username": username,
            "display_name": username,
            "email": format!("{username}@example.com"),
            "credential": credential,
            "role": role,
            "created_at": Utc::now(),
        });
        self.rows
            .lock()
            .unwrap()
            .entry(collections::USERS.to_string())
            .or_default()
            .push(row.clone());
        serde_json::from_value(row).expect("seeded user row must decode")
    }

    /// Seed an arbitrary row with a server-assigned id and timestamp.
    pub fn seed_row(&self, collection: &str, mut row: Value) -> Value {
        let object = row.as_object_mut().expect("seed row must be an object");
        object
            .entry("id")
            .or_insert_with(|| json!(Uuid::new_v4()));
        object
            .entry("created_at")
            .or_insert_with(|| json!(Utc::now()));
        let row = Value::Object(object.clone());
        self.rows
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(row.clone());
        row
    }

    pub fn stored_objects(&self, bucket: &str) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .get(bucket)
            .map(|objects| objects.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn select(
        &self,
        collection: &str,
        filters: &[Filter],
        order: Option<Order>,
    ) -> Result<Vec<Value>, GatewayError> {
        self.record_call(format!("select:{collection}"));
        self.check_failure("select")?;

        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<Value> = rows
            .get(collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        filters.iter().all(|f| {
                            row.get(&f.column)
                                .map(|v| field_as_string(v) == f.value)
                                .unwrap_or(false)
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = order {
            matched.sort_by(|a, b| {
                let left = a.get(&order.column).map(field_as_string).unwrap_or_default();
                let right = b.get(&order.column).map(field_as_string).unwrap_or_default();
                if order.ascending {
                    left.cmp(&right)
                } else {
                    right.cmp(&left)
                }
            });
        }
        Ok(matched)
    }

    async fn insert(&self, collection: &str, mut record: Value) -> Result<Value, GatewayError> {
        self.record_call(format!("insert:{collection}"));
        self.check_failure("insert")?;

        let object = record
            .as_object_mut()
            .ok_or_else(|| GatewayError::RemoteRejection {
                status: 400,
                message: "record must be an object".to_string(),
            })?;
        object.insert("id".to_string(), json!(Uuid::new_v4()));
        object.insert("created_at".to_string(), json!(Utc::now()));

        let row = Value::Object(object.clone());
        self.rows
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(&self, collection: &str, id: Uuid, patch: Value) -> Result<Value, GatewayError> {
        self.record_call(format!("update:{collection}"));
        self.check_failure("update")?;

        let mut rows = self.rows.lock().unwrap();
        let rows = rows.entry(collection.to_string()).or_default();
        let row = rows
            .iter_mut()
            .find(|row| row.get("id").map(field_as_string) == Some(id.to_string()))
            .ok_or_else(|| GatewayError::RemoteRejection {
                status: 404,
                message: format!("no row {id} in {collection}"),
            })?;

        if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
            for (key, value) in fields {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(row.clone())
    }

    async fn update_credential(
        &self,
        user_id: Uuid,
        new_credential: &str,
    ) -> Result<(), GatewayError> {
        self.record_call("update_credential".to_string());
        self.check_failure("update_credential")?;

        let mut rows = self.rows.lock().unwrap();
        let rows = rows.entry(collections::USERS.to_string()).or_default();
        let row = rows
            .iter_mut()
            .find(|row| row.get("id").map(field_as_string) == Some(user_id.to_string()))
            .ok_or_else(|| GatewayError::RemoteRejection {
                status: 404,
                message: format!("no user {user_id}"),
            })?;
        if let Some(target) = row.as_object_mut() {
            target.insert("credential".to_string(), json!(new_credential));
        }
        Ok(())
    }

    async fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<(), GatewayError> {
        self.record_call("upload".to_string());
        self.check_failure("upload")?;

        self.objects
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default()
            .push((path.to_string(), bytes));
        Ok(())
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<FileMeta>, GatewayError> {
        self.record_call("list".to_string());
        self.check_failure("list")?;

        let objects = self.objects.lock().unwrap();
        let files = objects
            .get(bucket)
            .map(|objects| {
                objects
                    .iter()
                    .filter_map(|(key, bytes)| {
                        key.strip_prefix(prefix).map(|name| FileMeta {
                            name: name.to_string(),
                            created_at: None,
                            size: Some(bytes.len() as u64),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(files)
    }

    async fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_secs: u64,
    ) -> Result<String, GatewayError> {
        self.record_call("signed_url".to_string());
        self.check_failure("signed_url")?;

        Ok(format!(
            "https://storage.test/sign/{bucket}/{path}?expires_in={ttl_secs}"
        ))
    }
}

/// Typed facade over a shared fake store.
pub fn records(store: &Arc<InMemoryStore>) -> Records {
    Records::new(store.clone() as Arc<dyn RecordStore>)
}

/// Seed a user and sign them in, returning the live session.
pub async fn signed_in_session(
    store: &Arc<InMemoryStore>,
    username: &str,
    role: Role,
) -> Arc<Session> {
    store.seed_user(username, "secret123", role);
    let session = Arc::new(Session::new());
    session
        .login(&records(store), username, "secret123")
        .await
        .expect("seeded login must succeed");
    session
}
