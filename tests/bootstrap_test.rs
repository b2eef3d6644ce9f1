//! Post-login bootstrap tests
//!
//! Run against recording fakes; each test checks the order of collaborator
//! calls and what ends up in the session state.

mod common;

use chainfr::storage::WALLET_FILE_NAME;
use chainfr::{bootstrap, Action, Drive, Recipient, SessionError, SessionStore};
use common::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_bootstrap_creates_wallet_when_absent() {
    let env = TestEnvironment::new(false);

    let outcome = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap();

    assert!(outcome.wallet_created);
    assert_eq!(outcome.account_count, 2);
    assert_eq!(outcome.user.master_key, MASTER_KEY);
    assert_eq!(
        env.log.calls(),
        vec![
            format!("register({}, {})", ID_TOKEN, USER_EMAIL),
            "get_wallet".to_string(),
            "clear_cloud_wallet_accounts".to_string(),
            format!("create_cloud_wallet({})", MASTER_KEY),
            "get_crypto_accounts".to_string(),
        ]
    );
    assert!(env.drive.has_wallet());
}

#[tokio::test]
async fn test_bootstrap_skips_creation_when_wallet_exists() {
    let env = TestEnvironment::new(true);

    let outcome = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap();

    assert!(!outcome.wallet_created);
    assert_eq!(
        env.log.calls(),
        vec![
            format!("register({}, {})", ID_TOKEN, USER_EMAIL),
            "get_wallet".to_string(),
            "get_crypto_accounts".to_string(),
        ]
    );
    assert!(env.log.position("clear_cloud_wallet_accounts").is_none());
    assert!(env.log.position("create_cloud_wallet").is_none());
}

#[tokio::test]
async fn test_bootstrap_populates_session() {
    let env = TestEnvironment::new(true);
    let before = chrono::Utc::now().timestamp();

    env.manager
        .post_login_preparation(&login_result())
        .await
        .unwrap();

    let state = env.manager.state();
    let login = state.login.as_ref().expect("login recorded");
    assert_eq!(login.id_token, ID_TOKEN);
    assert!(login.last_login_timestamp.unwrap() >= before);
    assert_eq!(state.user.as_ref().unwrap().email, USER_EMAIL);
    assert_eq!(state.crypto_accounts.len(), 2);
    assert_eq!(state.register_time.unwrap().timestamp(), 1_600_000_000);
    assert!(state.pending.is_empty());
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_registration_failure_stops_sequence() {
    let env = TestEnvironment::new(false);
    env.api.fail("register");

    let err = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Registration(_)));
    assert_eq!(env.log.calls().len(), 1);
    assert!(env.log.position("get_wallet").is_none());
    assert!(env.log.position("get_crypto_accounts").is_none());

    let state = env.manager.state();
    assert!(!state.is_pending(Action::PostLoginPreparation));
    assert!(state.error.as_deref().unwrap().starts_with("Registration failed"));
    assert!(state.user.is_none());
}

#[tokio::test]
async fn test_failed_bootstrap_blocks_authenticated_actions() {
    let env = TestEnvironment::new(true);
    env.api.fail("register");

    assert!(env
        .manager
        .post_login_preparation(&login_result())
        .await
        .is_err());
    let state = env.manager.state();
    assert!(state.login.is_some());
    assert!(!state.is_logged_in());

    let err = env
        .manager
        .add_recipient(Recipient::new("B", "b@x.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::NotLoggedIn));
    assert!(env.log.position("add_recipient").is_none());
}

#[tokio::test]
async fn test_account_fetch_failure_is_not_logged_in() {
    let env = TestEnvironment::new(true);
    env.api.fail("get_crypto_accounts");

    assert!(env
        .manager
        .post_login_preparation(&login_result())
        .await
        .is_err());

    assert!(!env.manager.state().is_logged_in());
    assert!(matches!(
        env.manager.get_recipients().await,
        Err(SessionError::NotLoggedIn)
    ));
}

#[tokio::test]
async fn test_wallet_lookup_failure_is_storage_error() {
    let env = TestEnvironment::new(false);
    *env.drive.fail_lookup.lock().unwrap() = true;

    let err = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Storage(_)));
    assert!(env.log.position("clear_cloud_wallet_accounts").is_none());
    assert!(env.log.position("get_crypto_accounts").is_none());
}

#[tokio::test]
async fn test_clear_failure_aborts_before_create() {
    let env = TestEnvironment::new(false);
    env.api.fail("clear_cloud_wallet_accounts");

    let err = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::WalletCreation(_)));
    assert!(env.log.position("create_cloud_wallet").is_none());
    assert!(env.log.position("get_crypto_accounts").is_none());
    assert!(env.manager.state().crypto_accounts.is_empty());
}

#[tokio::test]
async fn test_create_failure_leaves_accounts_empty_and_retry_succeeds() {
    let env = TestEnvironment::new(false);
    *env.drive.fail_create.lock().unwrap() = true;

    let err = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::WalletCreation(_)));
    assert!(env.log.position("get_crypto_accounts").is_none());
    assert!(env.manager.state().crypto_accounts.is_empty());

    // Retry the whole sequence once the drive recovers
    *env.drive.fail_create.lock().unwrap() = false;
    env.manager.clear_error();
    let outcome = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap();

    assert!(outcome.wallet_created);
    assert_eq!(env.manager.state().crypto_accounts.len(), 2);
    assert!(env.manager.state().error.is_none());
}

#[tokio::test]
async fn test_account_fetch_failure() {
    let env = TestEnvironment::new(true);
    env.api.fail("get_crypto_accounts");

    let err = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::AccountFetch(_)));
    // Registration already happened and is not rolled back
    assert!(env.manager.state().user.is_some());
}

#[tokio::test]
async fn test_second_bootstrap_reuses_created_wallet() {
    let env = TestEnvironment::new(false);

    let first = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap();
    let second = env
        .manager
        .post_login_preparation(&login_result())
        .await
        .unwrap();

    assert!(first.wallet_created);
    assert!(!second.wallet_created);
    let creates = env
        .log
        .calls()
        .iter()
        .filter(|c| c.starts_with("create_cloud_wallet"))
        .count();
    assert_eq!(creates, 1);
}

#[tokio::test]
async fn test_login_signs_in_then_bootstraps() {
    let env = TestEnvironment::new(true);

    env.manager.login().await.unwrap();

    assert_eq!(env.log.position("sign_in"), Some(0));
    assert!(env.log.position("register").unwrap() > 0);
    assert!(env.manager.state().is_logged_in());
}

#[tokio::test]
async fn test_cancelled_sign_in_is_auth_error() {
    let env = TestEnvironment::new(true);
    *env.identity.cancel_sign_in.lock().unwrap() = true;

    let err = env.manager.login().await.unwrap_err();

    assert!(matches!(err, SessionError::Auth(_)));
    assert!(env.log.position("register").is_none());
    let state = env.manager.state();
    assert!(!state.is_logged_in());
    assert!(!state.is_pending(Action::Login));
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_foreign_wallet_file_counts_as_existing_wallet() {
    init_logging();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(WALLET_FILE_NAME);
    std::fs::write(&path, r#"{"encryptedWallet":"abc"}"#).unwrap();

    let log = CallLog::default();
    let api = FakeApi::new(log.clone());
    let drive = Drive::new_with_base_dir(temp_dir.path().to_path_buf());
    let store = SessionStore::new();

    // Retrying must keep working against the same file
    for _ in 0..2 {
        let outcome = bootstrap(&api, &drive, &drive, &store, &login_result())
            .await
            .unwrap();
        assert!(!outcome.wallet_created);
        assert_eq!(outcome.account_count, 2);
    }

    assert!(log.position("clear_cloud_wallet_accounts").is_none());
    assert!(store.snapshot().is_logged_in());
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        r#"{"encryptedWallet":"abc"}"#
    );
}
