/// Axum HTTP handlers for the transfer API endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::store::{MockStore, StoreError};
use crate::types::*;

/// Shared application state
pub type AppState = Arc<MockStore>;

/// Custom error type for handlers
pub enum ApiError {
    NotFound(String),
    Unauthorized(String),
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownToken => ApiError::Unauthorized(err.to_string()),
            StoreError::UserNotFound(_) | StoreError::RecipientNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            StoreError::RecipientExists(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

/// POST /api/v1/user/register
/// Registers the user (or fetches the existing record) and binds the token
pub async fn register(
    State(store): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Json<UserRecord> {
    Json(store.register(&req.id_token, req.user_profile))
}

/// GET /api/v1/user/profile?email=
pub async fn get_user_profile(
    State(store): State<AppState>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(store.profile_by_email(&query.email)?))
}

/// POST /api/v1/recipients/list
pub async fn list_recipients(
    State(store): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<Vec<Recipient>>, ApiError> {
    Ok(Json(store.recipients(&req.id_token)?))
}

/// POST /api/v1/recipients/add
/// Returns the updated recipient list
pub async fn add_recipient(
    State(store): State<AppState>,
    Json(req): Json<RecipientRequest>,
) -> Result<Json<Vec<Recipient>>, ApiError> {
    log::info!("Adding recipient {}", req.recipient.email);
    Ok(Json(store.add_recipient(&req.id_token, req.recipient)?))
}

/// POST /api/v1/recipients/remove
/// Returns the updated recipient list
pub async fn remove_recipient(
    State(store): State<AppState>,
    Json(req): Json<RecipientRequest>,
) -> Result<Json<Vec<Recipient>>, ApiError> {
    log::info!("Removing recipient {}", req.recipient.email);
    Ok(Json(store.remove_recipient(&req.id_token, &req.recipient)?))
}

/// POST /api/v1/accounts/list
pub async fn list_crypto_accounts(
    State(store): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<Vec<CryptoAccount>>, ApiError> {
    Ok(Json(store.crypto_accounts(&req.id_token)?))
}

/// POST /api/v1/accounts/clear-cloud-wallet
pub async fn clear_cloud_wallet_accounts(
    State(store): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<ClearAccountsResponse>, ApiError> {
    let removed = store.clear_cloud_wallet_accounts(&req.id_token)?;
    log::info!("Cleared {} cloud wallet account(s)", removed);
    Ok(Json(ClearAccountsResponse { removed }))
}

/// POST /api/v1/user/cloud-wallet-folder-meta
pub async fn get_cloud_wallet_folder_meta(
    State(store): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<CloudWalletFolderMeta>, ApiError> {
    Ok(Json(store.folder_meta(&req.id_token)?))
}

/// POST /api/v1/user/register-time
pub async fn get_user_register_time(
    State(store): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<RegisterTimeResponse>, ApiError> {
    let register_time = store.register_time(&req.id_token)?;
    Ok(Json(RegisterTimeResponse { register_time }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}
