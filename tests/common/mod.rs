//! Shared test utilities: recording fakes for every session collaborator
//!
//! All fakes append to one shared call log so tests can assert on the exact
//! order in which the session layer talks to its collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use chainfr::{
    AuthError, BackendError, BoxError, CloudStorage, CloudWalletFolderMeta, CryptoAccount,
    CryptoType, IdentityProvider, LoginResult, Notification, Recipient, RemoteApi,
    SessionManager, StorageError, UserProfile, UserRecord, WalletFile, WalletProvisioner,
    WalletType,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub const ID_TOKEN: &str = "id-token-1";
pub const MASTER_KEY: &str = "master-key-1";
pub const USER_EMAIL: &str = "alice@example.com";

/// Initialize logging once for the test binary
pub fn init_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, call: &str) -> bool {
        self.calls().iter().any(|c| c == call)
    }

    /// Position of the first call starting with `prefix`
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.starts_with(prefix))
    }
}

pub fn profile(email: &str) -> UserProfile {
    UserProfile {
        name: "Alice".into(),
        email: email.into(),
        image_url: None,
        google_id: Some("google-1".into()),
    }
}

pub fn login_result() -> LoginResult {
    LoginResult::new(ID_TOKEN, profile(USER_EMAIL))
}

pub fn account(id: &str) -> CryptoAccount {
    CryptoAccount {
        id: id.into(),
        crypto_type: CryptoType::Ethereum,
        wallet_type: WalletType::Drive,
        address: format!("0x{}", id),
        name: format!("Account {}", id),
    }
}

pub fn image_for(email: &str) -> String {
    format!("https://images.example/{}", email)
}

// ============================================================================
// Remote API
// ============================================================================

pub struct FakeApi {
    log: CallLog,
    pub recipients: Mutex<Vec<Recipient>>,
    pub accounts: Vec<CryptoAccount>,
    /// Method names that fail with a 500
    pub failing: Mutex<HashSet<&'static str>>,
    /// Emails whose profile lookup fails
    pub missing_profiles: Mutex<HashSet<String>>,
}

impl FakeApi {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            recipients: Mutex::new(Vec::new()),
            accounts: vec![account("1"), account("2")],
            failing: Mutex::new(HashSet::new()),
            missing_profiles: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail(&self, method: &'static str) {
        self.failing.lock().unwrap().insert(method);
    }

    fn check(&self, method: &'static str) -> Result<(), BackendError> {
        if self.failing.lock().unwrap().contains(method) {
            return Err(BackendError::status(500, format!("{} unavailable", method)));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteApi for FakeApi {
    async fn register(
        &self,
        id_token: &str,
        profile: &UserProfile,
    ) -> Result<UserRecord, BackendError> {
        self.log.record(format!("register({}, {})", id_token, profile.email));
        self.check("register")?;
        Ok(UserRecord {
            email: profile.email.clone(),
            name: profile.name.clone(),
            master_key: MASTER_KEY.into(),
            register_time: Some(1_600_000_000),
        })
    }

    async fn get_recipients(&self, _id_token: &str) -> Result<Vec<Recipient>, BackendError> {
        self.log.record("get_recipients");
        self.check("get_recipients")?;
        Ok(self.recipients.lock().unwrap().clone())
    }

    async fn add_recipient(&self, _id_token: &str, recipient: &Recipient) -> Result<(), BackendError> {
        self.log.record(format!("add_recipient({})", recipient.email));
        self.check("add_recipient")?;
        self.recipients.lock().unwrap().push(recipient.clone());
        Ok(())
    }

    async fn remove_recipient(
        &self,
        _id_token: &str,
        recipient: &Recipient,
    ) -> Result<(), BackendError> {
        self.log.record(format!("remove_recipient({})", recipient.email));
        self.check("remove_recipient")?;
        self.recipients
            .lock()
            .unwrap()
            .retain(|r| r.email != recipient.email);
        Ok(())
    }

    async fn get_user_profile_by_email(&self, email: &str) -> Result<UserProfile, BackendError> {
        if self.missing_profiles.lock().unwrap().contains(email) {
            return Err(BackendError::status(404, "user not found"));
        }
        Ok(UserProfile {
            image_url: Some(image_for(email)),
            ..profile(email)
        })
    }

    async fn clear_cloud_wallet_accounts(&self, _id_token: &str) -> Result<(), BackendError> {
        self.log.record("clear_cloud_wallet_accounts");
        self.check("clear_cloud_wallet_accounts")
    }

    async fn get_crypto_accounts(
        &self,
        _id_token: &str,
    ) -> Result<Vec<CryptoAccount>, BackendError> {
        self.log.record("get_crypto_accounts");
        self.check("get_crypto_accounts")?;
        Ok(self.accounts.clone())
    }

    async fn get_cloud_wallet_folder_meta(
        &self,
        _id_token: &str,
    ) -> Result<CloudWalletFolderMeta, BackendError> {
        self.log.record("get_cloud_wallet_folder_meta");
        self.check("get_cloud_wallet_folder_meta")?;
        Ok(CloudWalletFolderMeta {
            file_id: "folder-1".into(),
            last_modified: DateTime::from_timestamp(1_650_000_000, 0).unwrap(),
        })
    }

    async fn get_user_register_time(&self, _id_token: &str) -> Result<DateTime<Utc>, BackendError> {
        self.log.record("get_user_register_time");
        self.check("get_user_register_time")?;
        Ok(DateTime::from_timestamp(1_600_000_000, 0).unwrap())
    }
}

// ============================================================================
// Cloud drive
// ============================================================================

pub struct FakeDrive {
    log: CallLog,
    pub wallet: Mutex<Option<WalletFile>>,
    pub fail_lookup: Mutex<bool>,
    pub fail_create: Mutex<bool>,
}

impl FakeDrive {
    pub fn new(log: CallLog, has_wallet: bool) -> Self {
        let wallet = has_wallet.then(|| WalletFile {
            version: 1,
            created_at: Utc::now(),
            key_fingerprint: "existing".into(),
        });
        Self {
            log,
            wallet: Mutex::new(wallet),
            fail_lookup: Mutex::new(false),
            fail_create: Mutex::new(false),
        }
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.lock().unwrap().is_some()
    }
}

#[async_trait]
impl CloudStorage for FakeDrive {
    async fn get_wallet(&self) -> Result<Option<WalletFile>, StorageError> {
        self.log.record("get_wallet");
        if *self.fail_lookup.lock().unwrap() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "drive offline",
            )));
        }
        Ok(self.wallet.lock().unwrap().clone())
    }

    async fn delete_wallet(&self) -> Result<(), StorageError> {
        self.log.record("delete_wallet");
        *self.wallet.lock().unwrap() = None;
        Ok(())
    }
}

#[async_trait]
impl WalletProvisioner for FakeDrive {
    async fn create_cloud_wallet(&self, master_key: &str) -> Result<(), BoxError> {
        self.log.record(format!("create_cloud_wallet({})", master_key));
        if *self.fail_create.lock().unwrap() {
            return Err("drive quota exceeded".into());
        }
        *self.wallet.lock().unwrap() = Some(WalletFile {
            version: 1,
            created_at: Utc::now(),
            key_fingerprint: master_key.into(),
        });
        Ok(())
    }
}

// ============================================================================
// Identity provider
// ============================================================================

pub struct FakeIdentity {
    log: CallLog,
    pub signed_in: Mutex<bool>,
    pub cancel_sign_in: Mutex<bool>,
}

impl FakeIdentity {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            signed_in: Mutex::new(false),
            cancel_sign_in: Mutex::new(false),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self) -> Result<LoginResult, AuthError> {
        self.log.record("sign_in");
        if *self.cancel_sign_in.lock().unwrap() {
            return Err(AuthError::Cancelled);
        }
        *self.signed_in.lock().unwrap() = true;
        Ok(login_result())
    }

    async fn is_signed_in(&self) -> bool {
        *self.signed_in.lock().unwrap()
    }

    async fn disconnect(&self) -> Result<(), AuthError> {
        self.log.record("disconnect");
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.log.record("sign_out");
        *self.signed_in.lock().unwrap() = false;
        Ok(())
    }
}

// ============================================================================
// Test environment
// ============================================================================

pub struct TestEnvironment {
    pub log: CallLog,
    pub api: Arc<FakeApi>,
    pub drive: Arc<FakeDrive>,
    pub identity: Arc<FakeIdentity>,
    pub manager: SessionManager,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
}

impl TestEnvironment {
    pub fn new(has_wallet: bool) -> Self {
        init_logging();

        let log = CallLog::default();
        let api = Arc::new(FakeApi::new(log.clone()));
        let drive = Arc::new(FakeDrive::new(log.clone(), has_wallet));
        let identity = Arc::new(FakeIdentity::new(log.clone()));

        let (manager, notifications) =
            SessionManager::new(identity.clone(), api.clone(), drive.clone(), drive.clone());

        Self {
            log,
            api,
            drive,
            identity,
            manager,
            notifications,
        }
    }

    /// Environment with a completed login and the given recipients on the backend
    pub async fn logged_in(recipients: Vec<Recipient>) -> Self {
        let env = Self::new(true);
        *env.api.recipients.lock().unwrap() = recipients;
        env.manager
            .post_login_preparation(&login_result())
            .await
            .expect("bootstrap");
        env.manager.get_recipients().await.expect("recipients");
        env
    }

    /// Drain every notification emitted so far
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.notifications.try_recv() {
            out.push(n);
        }
        out
    }
}
