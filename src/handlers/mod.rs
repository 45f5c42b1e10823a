pub mod analytics;
pub mod products;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::analytics::Analytics;
use crate::catalog::query::CatalogQueries;
use crate::catalog::service::CatalogService;
use crate::store::{CatalogStore, OrderStore, UserStore};

/// Shared handler state: the catalog write/read services and the
/// analytics aggregator over one store, plus the raw store handle for
/// health checks.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub queries: CatalogQueries,
    pub analytics: Analytics,
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub fn new(
        catalog_store: Arc<dyn CatalogStore>,
        user_store: Arc<dyn UserStore>,
        order_store: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            catalog: CatalogService::new(catalog_store.clone()),
            queries: CatalogQueries::new(catalog_store.clone()),
            analytics: Analytics::new(catalog_store.clone(), user_store, order_store),
            store: catalog_store,
        }
    }
}

/// Full application router. The mutation and analytics routes are
/// admin-only; the deployment layers its authentication/authorization
/// middleware in front of them, the handlers themselves never inspect
/// credentials.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(product_routes())
        .merge(analytics_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn product_routes() -> Router<AppState> {
    Router::new()
        // Public browse + admin create
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/subcategory/:subcategory_id",
            get(products::products_by_subcategory),
        )
        // Public read + admin update/delete
        .route(
            "/api/products/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}

fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/api/analytics/platform", get(analytics::platform))
        .route("/api/analytics/detailed", get(analytics::detailed))
        .route("/api/analytics/users", get(analytics::user_stats))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Catalog API",
            "version": version,
            "description": "Product catalog and platform analytics built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "products": "/api/products[/:id] (public browse, admin mutation)",
                "by_subcategory": "/api/products/subcategory/:subcategory_id (public)",
                "analytics": "/api/analytics/{platform,detailed,users} (admin)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
