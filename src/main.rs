use std::sync::Arc;

use catalog_api::config;
use catalog_api::handlers::{self, AppState};
use catalog_api::store::postgres::PostgresStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    let config = config::config();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    tracing::info!("Starting catalog API in {:?} mode", config.environment);

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let store = Arc::new(
        PostgresStore::connect(&database_url)
            .await
            .expect("database connection"),
    );

    let state = AppState::new(store.clone(), store.clone(), store);
    let app = handlers::router(state);

    // Allow deployments to override the port via env
    let port = std::env::var("CATALOG_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("catalog API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
