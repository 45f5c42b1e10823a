// Shared between the integration test binaries; not every binary uses
// every helper.
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use catalog_api::handlers::{router, AppState};
use catalog_api::store::memory::MemoryStore;

/// Router over a fresh in-memory store, plus the store handle for
/// seeding collaborator collections (subcategories, users, orders).
pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), store.clone(), store.clone());
    TestApp {
        app: router(state),
        store,
    }
}

async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body)?).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value))
}

pub async fn get(app: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    request(app, "GET", uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
    request(app, "POST", uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
    request(app, "PUT", uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Result<(StatusCode, Value)> {
    request(app, "DELETE", uri, None).await
}

/// Creates a single-variation product through the API and returns its id.
pub async fn create_product(
    app: &Router,
    subcategory: &str,
    name: &str,
    price: &str,
) -> Result<String> {
    let body = serde_json::json!({
        "name": name,
        "subcategory": subcategory,
        "variations": [{ "size": "M", "price": price, "stock": 5 }],
    });
    let (status, payload) = post_json(app, "/api/products", body).await?;
    anyhow::ensure!(
        status == StatusCode::CREATED,
        "create failed: {} {}",
        status,
        payload
    );
    Ok(payload["product"]["id"]
        .as_str()
        .expect("product id in response")
        .to_string())
}
