//! External collaborators of the session layer
//!
//! Every remote or platform dependency sits behind one of these traits so the
//! session logic can run against the HTTP client, the directory-backed drive,
//! or in-memory fakes in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{AuthError, BackendError, BoxError, StorageError};
use crate::models::{
    CloudWalletFolderMeta, CryptoAccount, LoginResult, Recipient, UserProfile, UserRecord,
    WalletFile,
};

/// Third-party OAuth sign-in
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<LoginResult, AuthError>;

    async fn is_signed_in(&self) -> bool;

    /// Revoke the app's grant for the signed-in account
    async fn disconnect(&self) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// Remote API of the transfer service
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Register the user, or fetch the existing record
    async fn register(
        &self,
        id_token: &str,
        profile: &UserProfile,
    ) -> Result<UserRecord, BackendError>;

    async fn get_recipients(&self, id_token: &str) -> Result<Vec<Recipient>, BackendError>;

    async fn add_recipient(
        &self,
        id_token: &str,
        recipient: &Recipient,
    ) -> Result<(), BackendError>;

    async fn remove_recipient(
        &self,
        id_token: &str,
        recipient: &Recipient,
    ) -> Result<(), BackendError>;

    async fn get_user_profile_by_email(&self, email: &str) -> Result<UserProfile, BackendError>;

    /// Drop every crypto account recorded for the user's cloud wallet
    async fn clear_cloud_wallet_accounts(&self, id_token: &str) -> Result<(), BackendError>;

    async fn get_crypto_accounts(&self, id_token: &str)
        -> Result<Vec<CryptoAccount>, BackendError>;

    async fn get_cloud_wallet_folder_meta(
        &self,
        id_token: &str,
    ) -> Result<CloudWalletFolderMeta, BackendError>;

    async fn get_user_register_time(&self, id_token: &str)
        -> Result<DateTime<Utc>, BackendError>;
}

/// User's cloud drive, holding at most one wallet file
#[async_trait]
pub trait CloudStorage: Send + Sync {
    async fn get_wallet(&self) -> Result<Option<WalletFile>, StorageError>;

    async fn delete_wallet(&self) -> Result<(), StorageError>;
}

/// Creates the cloud wallet for a freshly registered (or wallet-less) user
#[async_trait]
pub trait WalletProvisioner: Send + Sync {
    async fn create_cloud_wallet(&self, master_key: &str) -> Result<(), BoxError>;
}
