//! Chainfr: session core for sending crypto by email
//!
//! This crate holds the client-side session logic of the transfer app:
//! what happens after a user signs in with their identity provider, how the
//! cloud wallet is provisioned, and how the recipient address book is kept.
//!
//! # Architecture
//!
//! - **Account bootstrap**: ordered post-login sequence (register user, ensure
//!   one cloud wallet, load crypto accounts)
//! - **Session store**: single snapshot changed only through named events,
//!   observable through a `watch` channel
//! - **Collaborators**: identity provider, remote API and cloud drive behind
//!   async traits, with an HTTP client and a directory-backed drive provided
//!
//! # Example
//!
//! ```ignore
//! use chainfr::{ClientConfig, SessionManager};
//!
//! let config = ClientConfig::from_env();
//! let (manager, mut notifications) = SessionManager::from_config(&config, identity)?;
//!
//! let outcome = manager.login().await?;
//! println!("wallet created: {}", outcome.wallet_created);
//!
//! manager.get_recipients().await?;
//! for recipient in manager.state().recipients {
//!     println!("{} <{}>", recipient.name, recipient.email);
//! }
//! ```

// Public modules
pub mod api;
pub mod bootstrap;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod notifications;
pub mod receive;
pub mod recipients;
pub mod session;
pub mod storage;

// Re-exports for convenience
pub use api::ApiClient;
pub use bootstrap::{bootstrap, BootstrapOutcome};
pub use collaborators::{CloudStorage, IdentityProvider, RemoteApi, WalletProvisioner};
pub use config::{ClientConfig, Network};
pub use error::{AuthError, BackendError, BoxError, SessionError, StorageError};
pub use manager::SessionManager;
pub use models::{
    CloudWalletFolderMeta, CryptoAccount, CryptoType, LoginResult, Recipient, TransferDraft,
    UserProfile, UserRecord, WalletFile, WalletType,
};
pub use notifications::{Notification, Notifier, Variant};
pub use receive::{ReceiveFlow, ReceiveStep};
pub use session::{Action, SessionEvent, SessionState, SessionStore};
pub use storage::Drive;

// Common result type
pub type Result<T> = std::result::Result<T, SessionError>;
