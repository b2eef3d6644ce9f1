//! HTTP client for the remote transfer API

pub mod client;
pub mod types;

pub use client::ApiClient;
