//! Data models shared by the session layer, the API client and the drive store
//!
//! Wire names follow the remote API (camelCase JSON).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public identity of a user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
}

/// Result of a successful identity-provider sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    /// Opaque credential forwarded to the remote API
    pub id_token: String,
    pub profile: UserProfile,
    /// Seconds since epoch, stamped when the login is recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_timestamp: Option<i64>,
}

impl LoginResult {
    pub fn new(id_token: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            id_token: id_token.into(),
            profile,
            last_login_timestamp: None,
        }
    }

    /// Copy of this login stamped with `timestamp`
    pub fn stamped(&self, timestamp: i64) -> Self {
        Self {
            last_login_timestamp: Some(timestamp),
            ..self.clone()
        }
    }
}

/// User as registered with the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    /// Opaque key material used to create the cloud wallet
    pub master_key: String,
    /// Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register_time: Option<i64>,
}

/// Marker for a wallet stored in the user's cloud drive
///
/// Only its presence matters to the login bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletFile {
    pub version: u32,
    pub created_at: DateTime<Utc>,
    /// Hex SHA-256 of the master key the wallet was created for
    pub key_fingerprint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CryptoType {
    Bitcoin,
    Ethereum,
    Dai,
    Libra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletType {
    Drive,
    Metamask,
    Ledger,
    Coinbase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoAccount {
    pub id: String,
    pub crypto_type: CryptoType,
    pub wallet_type: WalletType,
    pub address: String,
    pub name: String,
}

/// Address-book entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Recipient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            image_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudWalletFolderMeta {
    pub file_id: String,
    pub last_modified: DateTime<Utc>,
}

/// Prefill for the transfer form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferDraft {
    pub destination: String,
    pub receiver_name: String,
    pub destination_error: Option<String>,
}
