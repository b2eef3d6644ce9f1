//! Post-login account bootstrap
//!
//! Runs once per successful sign-in:
//! 1. Record the login with a timestamp
//! 2. Register (or fetch) the user
//! 3. If the cloud drive has no wallet: clear stale cloud-wallet accounts, then create the wallet
//! 4. Replace the session's crypto accounts with a fresh fetch
//! 5. Mark the session ready for authenticated actions
//!
//! Steps run strictly in order and the first failure aborts the rest. Nothing
//! is rolled back, so the whole sequence is meant to be retried from step 1.

use chrono::Utc;

use crate::collaborators::{CloudStorage, RemoteApi, WalletProvisioner};
use crate::error::SessionError;
use crate::models::{LoginResult, UserRecord};
use crate::session::{SessionEvent, SessionStore};

#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    pub user: UserRecord,
    /// False when the drive already held a wallet
    pub wallet_created: bool,
    pub account_count: usize,
}

pub async fn bootstrap(
    api: &dyn RemoteApi,
    drive: &dyn CloudStorage,
    provisioner: &dyn WalletProvisioner,
    store: &SessionStore,
    login: &LoginResult,
) -> Result<BootstrapOutcome, SessionError> {
    let login = login.stamped(Utc::now().timestamp());
    store.dispatch(SessionEvent::LoginReturned(login.clone()));
    log::info!("Preparing session for {}", login.profile.email);

    let user = api
        .register(&login.id_token, &login.profile)
        .await
        .map_err(SessionError::Registration)?;
    store.dispatch(SessionEvent::Registered(user.clone()));

    let wallet_created = match drive.get_wallet().await? {
        Some(wallet) => {
            log::debug!("Cloud wallet present (created {})", wallet.created_at);
            false
        }
        None => {
            log::info!("No cloud wallet found, creating one");
            // Accounts left over from a wallet that no longer exists
            api.clear_cloud_wallet_accounts(&login.id_token)
                .await
                .map_err(SessionError::wallet_creation)?;
            provisioner
                .create_cloud_wallet(&user.master_key)
                .await
                .map_err(SessionError::WalletCreation)?;
            true
        }
    };

    let accounts = api
        .get_crypto_accounts(&login.id_token)
        .await
        .map_err(SessionError::AccountFetch)?;
    let account_count = accounts.len();
    store.dispatch(SessionEvent::CryptoAccountsLoaded(accounts));
    store.dispatch(SessionEvent::BootstrapCompleted);

    log::info!(
        "Session ready: {} crypto account(s), wallet created: {}",
        account_count,
        wallet_created
    );

    Ok(BootstrapOutcome {
        user,
        wallet_created,
        account_count,
    })
}
