//! Request and response bodies of the remote API

use serde::{Deserialize, Serialize};

use crate::models::{Recipient, UserProfile};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest<'a> {
    pub id_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub id_token: &'a str,
    pub user_profile: &'a UserProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientRequest<'a> {
    pub id_token: &'a str,
    pub recipient: &'a Recipient,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTimeResponse {
    /// Unix seconds
    pub register_time: i64,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
