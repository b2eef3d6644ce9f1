//! Session state and its named transitions
//!
//! The session is a single snapshot owned by [`SessionStore`]. It only changes
//! through [`SessionEvent`]s applied by [`SessionState::apply`]; readers get
//! clones or a `watch` receiver and never write fields directly.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::watch;

use crate::models::{
    CloudWalletFolderMeta, CryptoAccount, LoginResult, Recipient, TransferDraft, UserRecord,
};

/// User-triggered operations that can be in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Login,
    PostLoginPreparation,
    Logout,
    GetRecipients,
    AddRecipient,
    EditRecipient,
    RemoveRecipient,
    GetCloudWalletFolderMeta,
    GetUserRegisterTime,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Sign-in returned; carries the timestamped login
    LoginReturned(LoginResult),
    /// Every bootstrap step succeeded; the session is usable
    BootstrapCompleted,
    Registered(UserRecord),
    CryptoAccountsLoaded(Vec<CryptoAccount>),
    RecipientsLoaded(Vec<Recipient>),
    RecipientAdded(Recipient),
    /// Removes every entry with the recipient's email
    RecipientRemoved(Recipient),
    TransferDraftUpdated(TransferDraft),
    NewUserTagSet(bool),
    CoinbaseAccessSet(serde_json::Value),
    CloudWalletFolderMetaLoaded(CloudWalletFolderMeta),
    RegisterTimeLoaded(DateTime<Utc>),
    ActionStarted(Action),
    ActionSucceeded(Action),
    ActionFailed { action: Action, message: String },
    ErrorCleared,
    LoggedOut,
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub login: Option<LoginResult>,
    pub user: Option<UserRecord>,
    pub recipients: Vec<Recipient>,
    pub crypto_accounts: Vec<CryptoAccount>,
    pub is_new_user: bool,
    pub coinbase_access: Option<serde_json::Value>,
    pub cloud_wallet_folder_meta: Option<CloudWalletFolderMeta>,
    pub register_time: Option<DateTime<Utc>>,
    pub transfer_draft: TransferDraft,
    /// Last failure, shown to the user until cleared
    pub error: Option<String>,
    /// Set once bootstrap finishes; a recorded login alone is not enough
    pub ready: bool,
    /// In-flight count per action
    pub pending: BTreeMap<Action, usize>,
}

impl SessionState {
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::LoginReturned(login) => {
                self.login = Some(login);
                self.ready = false;
            }
            SessionEvent::BootstrapCompleted => self.ready = true,
            SessionEvent::Registered(user) => {
                self.register_time = user
                    .register_time
                    .and_then(|secs| DateTime::from_timestamp(secs, 0));
                self.user = Some(user);
            }
            SessionEvent::CryptoAccountsLoaded(accounts) => self.crypto_accounts = accounts,
            SessionEvent::RecipientsLoaded(recipients) => self.recipients = recipients,
            SessionEvent::RecipientAdded(recipient) => self.recipients.push(recipient),
            SessionEvent::RecipientRemoved(recipient) => {
                self.recipients.retain(|r| r.email != recipient.email)
            }
            SessionEvent::TransferDraftUpdated(draft) => self.transfer_draft = draft,
            SessionEvent::NewUserTagSet(is_new_user) => self.is_new_user = is_new_user,
            SessionEvent::CoinbaseAccessSet(access) => self.coinbase_access = Some(access),
            SessionEvent::CloudWalletFolderMetaLoaded(meta) => {
                self.cloud_wallet_folder_meta = Some(meta)
            }
            SessionEvent::RegisterTimeLoaded(time) => self.register_time = Some(time),
            SessionEvent::ActionStarted(action) => {
                *self.pending.entry(action).or_insert(0) += 1;
            }
            SessionEvent::ActionSucceeded(action) => self.finish(action),
            SessionEvent::ActionFailed { action, message } => {
                self.finish(action);
                self.error = Some(message);
            }
            SessionEvent::ErrorCleared => self.error = None,
            SessionEvent::LoggedOut => *self = SessionState::default(),
        }
    }

    fn finish(&mut self, action: Action) {
        if let Some(count) = self.pending.get_mut(&action) {
            *count -= 1;
            if *count == 0 {
                self.pending.remove(&action);
            }
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.ready && self.login.is_some()
    }

    pub fn is_pending(&self, action: Action) -> bool {
        self.pending.contains_key(&action)
    }

    /// Credential for authenticated calls; `None` until bootstrap completes
    pub fn id_token(&self) -> Option<&str> {
        if !self.ready {
            return None;
        }
        self.login.as_ref().map(|login| login.id_token.as_str())
    }

    pub fn has_recipient(&self, email: &str) -> bool {
        self.recipients.iter().any(|r| r.email == email)
    }
}

/// Owner of the session snapshot
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self { tx }
    }

    pub fn dispatch(&self, event: SessionEvent) {
        log::debug!("Session event: {:?}", event);
        self.tx.send_modify(|state| state.apply(event));
    }

    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Read-only view that is notified on every transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
