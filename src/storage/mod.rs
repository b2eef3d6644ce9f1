//! Cloud drive persistence
//!
//! - Directory-backed drive holding the wallet marker file
//! - Cloud wallet provisioning on top of it

mod file_system;

pub use file_system::{Drive, WALLET_FILE_NAME, WALLET_FILE_VERSION};
