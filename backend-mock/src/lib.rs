/// Transfer API Mock Server Library
///
/// In-memory stand-in for the remote transfer API, usable as a standalone
/// binary for local development or embedded in tests.

pub mod handlers;
pub mod server;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use server::{create_router, run_server, serve};
pub use store::{MockStore, StoreError};
pub use types::*;
