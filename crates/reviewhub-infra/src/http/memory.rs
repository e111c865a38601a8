//! In-process stand-in for the collection endpoint.
//!
//! Behaves like a small json-server: `/{collection}` lists (with
//! single-field equality filters from the query string), `/{collection}/{id}`
//! addresses one record, POST assigns `max(id) + 1`, and `/{collection}.json`
//! serves the whole collection as a static document.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::RwLock;

use reviewhub_core::ports::{HttpRequest, HttpResponse, Method, Transport, TransportError};

#[derive(Default)]
pub struct InMemoryTransport {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    /// When set, writes must carry this bearer token or get a 401.
    required_token: Option<String>,
    requests: AtomicUsize,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required_token(mut self, token: impl Into<String>) -> Self {
        self.required_token = Some(token.into());
        self
    }

    /// Replace the records of one collection.
    pub async fn seed(&self, collection: &str, records: Vec<Value>) {
        self.collections
            .write()
            .await
            .insert(collection.to_string(), records);
    }

    pub async fn records(&self, collection: &str) -> Vec<Value> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn authorized(&self, request: &HttpRequest) -> bool {
        match (&self.required_token, request.method) {
            (None, _) | (_, Method::Get) => true,
            (Some(required), _) => request.bearer.as_deref() == Some(required.as_str()),
        }
    }

    async fn handle(&self, request: HttpRequest) -> HttpResponse {
        if !self.authorized(&request) {
            return respond(401, &json!({ "message": "Unauthorized" }));
        }

        let segments: Vec<&str> = request
            .path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match (request.method, segments.as_slice()) {
            (Method::Get, [file]) if file.ends_with(".json") => {
                let name = file.trim_end_matches(".json");
                match self.collections.read().await.get(name) {
                    Some(records) => respond(200, &Value::Array(records.clone())),
                    None => not_found(),
                }
            }
            (Method::Get, [name]) => match self.collections.read().await.get(*name) {
                Some(records) => {
                    let matching: Vec<Value> = records
                        .iter()
                        .filter(|record| {
                            request
                                .query
                                .iter()
                                .all(|(field, wanted)| field_equals(record, field, wanted))
                        })
                        .cloned()
                        .collect();
                    respond(200, &Value::Array(matching))
                }
                None => not_found(),
            },
            (Method::Get, [name, id]) => match self.collections.read().await.get(*name) {
                Some(records) => match records.iter().find(|r| field_equals(r, "id", id)) {
                    Some(record) => respond(200, record),
                    None => not_found(),
                },
                None => not_found(),
            },
            (Method::Post, [name]) => {
                let Some(Value::Object(mut body)) = request.body else {
                    return respond(400, &json!({ "message": "Expected a JSON object" }));
                };
                let mut collections = self.collections.write().await;
                let records = collections.entry(name.to_string()).or_default();
                if !body.contains_key("id") {
                    let next = records
                        .iter()
                        .filter_map(|r| match r.get("id") {
                            Some(Value::Number(n)) => n.as_u64(),
                            Some(Value::String(s)) => s.parse().ok(),
                            _ => None,
                        })
                        .max()
                        .unwrap_or(0)
                        + 1;
                    body.insert("id".to_string(), json!(next));
                }
                let record = Value::Object(body);
                records.push(record.clone());
                respond(201, &record)
            }
            (Method::Put, [name, id]) => {
                let Some(Value::Object(mut body)) = request.body else {
                    return respond(400, &json!({ "message": "Expected a JSON object" }));
                };
                let mut collections = self.collections.write().await;
                let Some(records) = collections.get_mut(*name) else {
                    return not_found();
                };
                match records.iter_mut().find(|r| field_equals(r, "id", id)) {
                    Some(existing) => {
                        if let Some(original_id) = existing.get("id").cloned() {
                            body.insert("id".to_string(), original_id);
                        }
                        *existing = Value::Object(body);
                        respond(200, existing)
                    }
                    None => not_found(),
                }
            }
            (Method::Delete, [name, id]) => {
                let mut collections = self.collections.write().await;
                let Some(records) = collections.get_mut(*name) else {
                    return not_found();
                };
                let before = records.len();
                records.retain(|r| !field_equals(r, "id", id));
                if records.len() == before {
                    not_found()
                } else {
                    respond(200, &json!({}))
                }
            }
            _ => not_found(),
        }
    }
}

/// Query-string comparison: numbers and strings both compare by their text.
fn field_equals(record: &Value, field: &str, wanted: &str) -> bool {
    match record.get(field) {
        Some(Value::String(s)) => s == wanted,
        Some(Value::Number(n)) => n.to_string() == wanted,
        Some(Value::Bool(b)) => b.to_string() == wanted,
        _ => false,
    }
}

fn respond(status: u16, body: &Value) -> HttpResponse {
    HttpResponse {
        status,
        body: body.to_string(),
    }
}

fn not_found() -> HttpResponse {
    respond(404, &json!({}))
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.handle(request).await)
    }
}
