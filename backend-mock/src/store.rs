/// In-memory user store
///
/// Holds registered users keyed by email and maps id tokens to users.
/// Tokens are opaque: whatever token a user registered with identifies them.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

use crate::types::*;

/// Wallet type of accounts that live in the user's cloud wallet
pub const CLOUD_WALLET_TYPE: &str = "drive";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown id token")]
    UnknownToken,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Recipient already exists: {0}")]
    RecipientExists(String),

    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),
}

#[derive(Debug, Clone)]
struct MockUser {
    profile: UserProfile,
    master_key: String,
    register_time: i64,
    recipients: Vec<Recipient>,
    crypto_accounts: Vec<CryptoAccount>,
    folder_meta: CloudWalletFolderMeta,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, MockUser>,
    tokens: HashMap<String, String>,
}

#[derive(Default)]
pub struct MockStore {
    inner: Mutex<Inner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user, or return the existing record for that email
    ///
    /// Either way the token is bound to the user.
    pub fn register(&self, id_token: &str, profile: UserProfile) -> UserRecord {
        let mut inner = self.inner.lock().unwrap();
        let email = profile.email.clone();

        let user = inner.users.entry(email.clone()).or_insert_with(|| {
            let now = Utc::now();
            log::info!("Registering new user {}", email);
            MockUser {
                profile,
                master_key: Uuid::new_v4().simple().to_string(),
                register_time: now.timestamp(),
                recipients: Vec::new(),
                crypto_accounts: Vec::new(),
                folder_meta: CloudWalletFolderMeta {
                    file_id: Uuid::new_v4().to_string(),
                    last_modified: now,
                },
            }
        });

        let record = UserRecord {
            email: user.profile.email.clone(),
            name: user.profile.name.clone(),
            master_key: user.master_key.clone(),
            register_time: user.register_time,
        };
        inner.tokens.insert(id_token.to_string(), email);
        record
    }

    fn with_user<T>(
        &self,
        id_token: &str,
        f: impl FnOnce(&mut MockUser) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let email = inner
            .tokens
            .get(id_token)
            .cloned()
            .ok_or(StoreError::UnknownToken)?;
        let user = inner
            .users
            .get_mut(&email)
            .ok_or(StoreError::UserNotFound(email))?;
        f(user)
    }

    pub fn recipients(&self, id_token: &str) -> Result<Vec<Recipient>, StoreError> {
        self.with_user(id_token, |user| Ok(user.recipients.clone()))
    }

    pub fn add_recipient(
        &self,
        id_token: &str,
        recipient: Recipient,
    ) -> Result<Vec<Recipient>, StoreError> {
        self.with_user(id_token, |user| {
            if user.recipients.iter().any(|r| r.email == recipient.email) {
                return Err(StoreError::RecipientExists(recipient.email));
            }
            user.recipients.push(recipient);
            Ok(user.recipients.clone())
        })
    }

    pub fn remove_recipient(
        &self,
        id_token: &str,
        recipient: &Recipient,
    ) -> Result<Vec<Recipient>, StoreError> {
        self.with_user(id_token, |user| {
            let before = user.recipients.len();
            user.recipients.retain(|r| r.email != recipient.email);
            if user.recipients.len() == before {
                return Err(StoreError::RecipientNotFound(recipient.email.clone()));
            }
            Ok(user.recipients.clone())
        })
    }

    pub fn profile_by_email(&self, email: &str) -> Result<UserProfile, StoreError> {
        let inner = self.inner.lock().unwrap();
        inner
            .users
            .get(email)
            .map(|user| user.profile.clone())
            .ok_or_else(|| StoreError::UserNotFound(email.to_string()))
    }

    pub fn crypto_accounts(&self, id_token: &str) -> Result<Vec<CryptoAccount>, StoreError> {
        self.with_user(id_token, |user| Ok(user.crypto_accounts.clone()))
    }

    /// Drop the user's cloud-wallet accounts, returning how many were removed
    pub fn clear_cloud_wallet_accounts(&self, id_token: &str) -> Result<usize, StoreError> {
        self.with_user(id_token, |user| {
            let before = user.crypto_accounts.len();
            user.crypto_accounts
                .retain(|account| account.wallet_type != CLOUD_WALLET_TYPE);
            Ok(before - user.crypto_accounts.len())
        })
    }

    pub fn folder_meta(&self, id_token: &str) -> Result<CloudWalletFolderMeta, StoreError> {
        self.with_user(id_token, |user| Ok(user.folder_meta.clone()))
    }

    pub fn register_time(&self, id_token: &str) -> Result<i64, StoreError> {
        self.with_user(id_token, |user| Ok(user.register_time))
    }

    /// Attach accounts to a registered user (test and dev seeding)
    pub fn seed_crypto_accounts(
        &self,
        email: &str,
        accounts: Vec<CryptoAccount>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(email)
            .ok_or_else(|| StoreError::UserNotFound(email.to_string()))?;
        user.crypto_accounts.extend(accounts);
        Ok(())
    }
}
