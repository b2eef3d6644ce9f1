use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::*;
use crate::collaborators::RemoteApi;
use crate::config::ClientConfig;
use crate::error::BackendError;
use crate::models::{CloudWalletFolderMeta, CryptoAccount, Recipient, UserProfile, UserRecord};

/// Remote API over HTTP + JSON
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    /// reqwest::Client is internally Arc-based
    http_client: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        log::debug!("POST {}", path);
        let response = self.http_client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    /// POST where only success matters
    async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), BackendError>
    where
        B: Serialize + ?Sized + Sync,
    {
        log::debug!("POST {}", path);
        let response = self.http_client.post(self.url(path)).json(body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error)
            .unwrap_or(text);
        Err(BackendError::status(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RemoteApi for ApiClient {
    async fn register(
        &self,
        id_token: &str,
        profile: &UserProfile,
    ) -> Result<UserRecord, BackendError> {
        self.post(
            "/api/v1/user/register",
            &RegisterRequest {
                id_token,
                user_profile: profile,
            },
        )
        .await
    }

    async fn get_recipients(&self, id_token: &str) -> Result<Vec<Recipient>, BackendError> {
        self.post("/api/v1/recipients/list", &TokenRequest { id_token })
            .await
    }

    async fn add_recipient(&self, id_token: &str, recipient: &Recipient) -> Result<(), BackendError> {
        self.post_unit(
            "/api/v1/recipients/add",
            &RecipientRequest {
                id_token,
                recipient,
            },
        )
        .await
    }

    async fn remove_recipient(
        &self,
        id_token: &str,
        recipient: &Recipient,
    ) -> Result<(), BackendError> {
        self.post_unit(
            "/api/v1/recipients/remove",
            &RecipientRequest {
                id_token,
                recipient,
            },
        )
        .await
    }

    async fn get_user_profile_by_email(&self, email: &str) -> Result<UserProfile, BackendError> {
        log::debug!("GET /api/v1/user/profile");
        let response = self
            .http_client
            .get(self.url("/api/v1/user/profile"))
            .query(&[("email", email)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn clear_cloud_wallet_accounts(&self, id_token: &str) -> Result<(), BackendError> {
        self.post_unit(
            "/api/v1/accounts/clear-cloud-wallet",
            &TokenRequest { id_token },
        )
        .await
    }

    async fn get_crypto_accounts(
        &self,
        id_token: &str,
    ) -> Result<Vec<CryptoAccount>, BackendError> {
        self.post("/api/v1/accounts/list", &TokenRequest { id_token })
            .await
    }

    async fn get_cloud_wallet_folder_meta(
        &self,
        id_token: &str,
    ) -> Result<CloudWalletFolderMeta, BackendError> {
        self.post(
            "/api/v1/user/cloud-wallet-folder-meta",
            &TokenRequest { id_token },
        )
        .await
    }

    async fn get_user_register_time(
        &self,
        id_token: &str,
    ) -> Result<DateTime<Utc>, BackendError> {
        let response: RegisterTimeResponse = self
            .post("/api/v1/user/register-time", &TokenRequest { id_token })
            .await?;
        DateTime::from_timestamp(response.register_time, 0).ok_or_else(|| {
            BackendError::other(format!(
                "register time out of range: {}",
                response.register_time
            ))
        })
    }
}
