/// Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::store::MockStore;

pub fn create_router(store: Arc<MockStore>) -> Router {
    // Allow requests from the web client during development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // User endpoints
        .route("/api/v1/user/register", post(register))
        .route("/api/v1/user/profile", get(get_user_profile))
        .route("/api/v1/user/cloud-wallet-folder-meta", post(get_cloud_wallet_folder_meta))
        .route("/api/v1/user/register-time", post(get_user_register_time))

        // Recipient endpoints
        .route("/api/v1/recipients/list", post(list_recipients))
        .route("/api/v1/recipients/add", post(add_recipient))
        .route("/api/v1/recipients/remove", post(remove_recipient))

        // Crypto account endpoints
        .route("/api/v1/accounts/list", post(list_crypto_accounts))
        .route("/api/v1/accounts/clear-cloud-wallet", post(clear_cloud_wallet_accounts))

        // Shared state
        .with_state(store)

        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve on an already bound listener (lets tests bind port 0)
pub async fn serve(listener: TcpListener, store: Arc<MockStore>) -> anyhow::Result<()> {
    let app = create_router(store);
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn run_server(store: Arc<MockStore>, host: String, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    log::info!("🚀 Transfer API mock listening on http://{}", addr);

    serve(listener, store).await
}
