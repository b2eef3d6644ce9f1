use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use crate::collaborators::{CloudStorage, WalletProvisioner};
use crate::error::{BoxError, StorageError};
use crate::models::WalletFile;

pub const WALLET_FILE_NAME: &str = "chainfr_wallet.json";
pub const WALLET_FILE_VERSION: u32 = 1;

/// App-data folder of the user's cloud drive, backed by a local directory
#[derive(Clone)]
pub struct Drive {
    base_path: PathBuf,
}

impl Drive {
    /// Create a drive rooted at the default directory ("./drive")
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from("./drive"),
        }
    }

    /// Create a drive with a custom root (for testing)
    pub fn new_with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_path
    }

    fn wallet_path(&self) -> PathBuf {
        self.base_path.join(WALLET_FILE_NAME)
    }

    pub fn wallet_exists(&self) -> bool {
        self.wallet_path().exists()
    }

    /// Load the wallet file, or `None` when the drive has none
    ///
    /// Presence is what counts. A file this client cannot parse (older
    /// format, another client's wallet) is still reported as present, with
    /// a marker built from the file metadata.
    pub fn load_wallet(&self) -> Result<Option<WalletFile>, StorageError> {
        let path = self.wallet_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(wallet) => Ok(Some(wallet)),
            Err(e) => {
                log::warn!("Unrecognized wallet file at {:?}, treating as present: {}", path, e);
                let created_at = fs::metadata(&path)
                    .and_then(|meta| meta.modified())
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(|_| Utc::now());
                Ok(Some(WalletFile {
                    version: 0,
                    created_at,
                    key_fingerprint: String::new(),
                }))
            }
        }
    }

    /// Write a new wallet file; refuses to overwrite an existing one
    pub fn save_wallet(&self, wallet: &WalletFile) -> Result<(), StorageError> {
        let path = self.wallet_path();
        fs::create_dir_all(&self.base_path)?;
        let json = serde_json::to_string_pretty(wallet)?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    StorageError::AlreadyExists(path.display().to_string())
                }
                _ => StorageError::Io(e),
            })?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Delete the wallet file; deleting a missing wallet is a no-op
    pub fn remove_wallet(&self) -> Result<(), StorageError> {
        let path = self.wallet_path();
        if !path.exists() {
            log::debug!("No wallet file at {:?}, nothing to delete", path);
            return Ok(());
        }

        log::warn!("Deleting cloud wallet file: {:?}", path);
        fs::remove_file(&path)?;
        Ok(())
    }
}

impl Default for Drive {
    fn default() -> Self {
        Self::new()
    }
}

fn key_fingerprint(master_key: &str) -> String {
    hex::encode(Sha256::digest(master_key.as_bytes()))
}

fn join_error(e: tokio::task::JoinError) -> StorageError {
    StorageError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("Drive task panicked: {}", e),
    ))
}

#[async_trait]
impl CloudStorage for Drive {
    async fn get_wallet(&self) -> Result<Option<WalletFile>, StorageError> {
        let drive = self.clone();
        tokio::task::spawn_blocking(move || drive.load_wallet())
            .await
            .map_err(join_error)?
    }

    async fn delete_wallet(&self) -> Result<(), StorageError> {
        let drive = self.clone();
        tokio::task::spawn_blocking(move || drive.remove_wallet())
            .await
            .map_err(join_error)?
    }
}

#[async_trait]
impl WalletProvisioner for Drive {
    async fn create_cloud_wallet(&self, master_key: &str) -> Result<(), BoxError> {
        let wallet = WalletFile {
            version: WALLET_FILE_VERSION,
            created_at: Utc::now(),
            key_fingerprint: key_fingerprint(master_key),
        };

        let drive = self.clone();
        tokio::task::spawn_blocking(move || drive.save_wallet(&wallet))
            .await
            .map_err(join_error)??;

        log::info!("Cloud wallet created in {:?}", self.base_path);
        Ok(())
    }
}
