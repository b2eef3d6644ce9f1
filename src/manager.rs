use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::api::ApiClient;
use crate::bootstrap::{bootstrap, BootstrapOutcome};
use crate::collaborators::{CloudStorage, IdentityProvider, RemoteApi, WalletProvisioner};
use crate::config::ClientConfig;
use crate::error::SessionError;
use crate::models::{CloudWalletFolderMeta, LoginResult, Recipient};
use crate::notifications::{Notification, Notifier};
use crate::recipients;
/// Session Manager - Orchestration Layer
///
/// Owns the collaborators, the session store and the notifier, and exposes
/// every user action. Each remote action is tracked as pending in the store
/// while it runs; a failure is recorded as the session error.
use crate::session::{Action, SessionEvent, SessionState, SessionStore};
use crate::storage::Drive;

pub struct SessionManager {
    identity: Arc<dyn IdentityProvider>,
    api: Arc<dyn RemoteApi>,
    drive: Arc<dyn CloudStorage>,
    provisioner: Arc<dyn WalletProvisioner>,
    store: SessionStore,
    notifier: Notifier,
}

impl SessionManager {
    // ============================================================================
    // Constructors
    // ============================================================================

    /// Build a manager against the configured HTTP API and local drive
    ///
    /// Returns the receiving half of the notification channel alongside.
    pub fn from_config(
        config: &ClientConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Notification>), SessionError> {
        let api = Arc::new(ApiClient::new(config)?);
        let drive = Arc::new(Drive::new_with_base_dir(config.drive_dir.clone()));
        log::info!("Session manager using API at {}", api.base_url());

        Ok(Self::new(identity, api, drive.clone(), drive))
    }

    /// Build a manager from explicit collaborators (for testing)
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        api: Arc<dyn RemoteApi>,
        drive: Arc<dyn CloudStorage>,
        provisioner: Arc<dyn WalletProvisioner>,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (notifier, notifications) = Notifier::channel();
        let manager = Self {
            identity,
            api,
            drive,
            provisioner,
            store: SessionStore::new(),
            notifier,
        };
        (manager, notifications)
    }

    // ============================================================================
    // State access
    // ============================================================================

    pub fn state(&self) -> SessionState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    fn id_token(&self) -> Result<String, SessionError> {
        self.store
            .snapshot()
            .id_token()
            .map(str::to_string)
            .ok_or(SessionError::NotLoggedIn)
    }

    /// Run `op` with `action` marked pending; failures become the session error
    async fn track<T, F>(&self, action: Action, op: F) -> Result<T, SessionError>
    where
        F: Future<Output = Result<T, SessionError>>,
    {
        self.store.dispatch(SessionEvent::ActionStarted(action));
        match op.await {
            Ok(value) => {
                self.store.dispatch(SessionEvent::ActionSucceeded(action));
                Ok(value)
            }
            Err(e) => {
                log::error!("{:?} failed: {}", action, e);
                self.store.dispatch(SessionEvent::ActionFailed {
                    action,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    // ============================================================================
    // Login / Logout
    // ============================================================================

    /// Sign in with the identity provider, then prepare the session
    pub async fn login(&self) -> Result<BootstrapOutcome, SessionError> {
        let login = self
            .track(Action::Login, async {
                Ok::<_, SessionError>(self.identity.sign_in().await?)
            })
            .await?;
        self.post_login_preparation(&login).await
    }

    /// Account bootstrap for a login the caller already obtained
    pub async fn post_login_preparation(
        &self,
        login: &LoginResult,
    ) -> Result<BootstrapOutcome, SessionError> {
        self.track(
            Action::PostLoginPreparation,
            bootstrap(
                self.api.as_ref(),
                self.drive.as_ref(),
                self.provisioner.as_ref(),
                &self.store,
                login,
            ),
        )
        .await
    }

    /// Sign out; with `disconnect` also revoke the grant, deleting the
    /// cloud wallet first when `delete_app_data` is set
    pub async fn logout(&self, disconnect: bool, delete_app_data: bool) -> Result<(), SessionError> {
        self.track(Action::Logout, async {
            if self.identity.is_signed_in().await {
                if disconnect {
                    if delete_app_data {
                        self.drive.delete_wallet().await?;
                    }
                    self.identity.disconnect().await?;
                }
                self.identity.sign_out().await?;
            }
            Ok::<_, SessionError>(())
        })
        .await?;

        self.store.dispatch(SessionEvent::LoggedOut);
        log::info!("Logged out");
        Ok(())
    }

    // ============================================================================
    // Recipients (delegates to recipients)
    // ============================================================================

    pub async fn get_recipients(&self) -> Result<usize, SessionError> {
        self.track(Action::GetRecipients, async {
            let id_token = self.id_token()?;
            recipients::refresh_recipients(self.api.as_ref(), &self.store, &id_token).await
        })
        .await
    }

    pub async fn add_recipient(&self, recipient: Recipient) -> Result<(), SessionError> {
        self.track(Action::AddRecipient, async {
            let id_token = self.id_token()?;
            recipients::add_recipient(
                self.api.as_ref(),
                &self.store,
                &self.notifier,
                &id_token,
                recipient,
            )
            .await
        })
        .await
    }

    pub async fn edit_recipient(&self, old: Recipient, new: Recipient) -> Result<(), SessionError> {
        self.track(Action::EditRecipient, async {
            let id_token = self.id_token()?;
            recipients::edit_recipient(
                self.api.as_ref(),
                &self.store,
                &self.notifier,
                &id_token,
                old,
                new,
            )
            .await
        })
        .await
    }

    pub async fn remove_recipient(&self, recipient: Recipient) -> Result<(), SessionError> {
        self.track(Action::RemoveRecipient, async {
            let id_token = self.id_token()?;
            recipients::remove_recipient(
                self.api.as_ref(),
                &self.store,
                &self.notifier,
                &id_token,
                recipient,
            )
            .await
        })
        .await
    }

    // ============================================================================
    // User meta
    // ============================================================================

    pub fn clear_error(&self) {
        self.store.dispatch(SessionEvent::ErrorCleared);
    }

    pub fn set_new_user_tag(&self, is_new_user: bool) {
        self.store.dispatch(SessionEvent::NewUserTagSet(is_new_user));
    }

    /// Store the Coinbase OAuth access object as-is
    pub fn set_coinbase_access_object(&self, access: serde_json::Value) {
        self.store.dispatch(SessionEvent::CoinbaseAccessSet(access));
    }

    pub async fn get_cloud_wallet_folder_meta(&self) -> Result<CloudWalletFolderMeta, SessionError> {
        self.track(Action::GetCloudWalletFolderMeta, async {
            let id_token = self.id_token()?;
            let meta = self.api.get_cloud_wallet_folder_meta(&id_token).await?;
            self.store
                .dispatch(SessionEvent::CloudWalletFolderMetaLoaded(meta.clone()));
            Ok::<_, SessionError>(meta)
        })
        .await
    }

    pub async fn get_user_register_time(&self) -> Result<DateTime<Utc>, SessionError> {
        self.track(Action::GetUserRegisterTime, async {
            let id_token = self.id_token()?;
            let time = self.api.get_user_register_time(&id_token).await?;
            self.store.dispatch(SessionEvent::RegisterTimeLoaded(time));
            Ok::<_, SessionError>(time)
        })
        .await
    }
}
