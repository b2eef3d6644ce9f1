/// Client configuration from environment variables
///
/// Controls the remote API endpoint, the target network and where the local
/// cloud drive keeps the wallet file. Defaults to Testnet.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_DRIVE_DIR: &str = "./drive";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Network the accounts live on
    pub network: Network,
    /// Remote API base URL
    pub api_url: String,
    /// Directory backing the cloud drive
    pub drive_dir: PathBuf,
    /// Per-request timeout for the HTTP client
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `CHAINFR_NETWORK`: "testnet" (default) or "mainnet"
    /// - `CHAINFR_API_URL`: remote API endpoint
    /// - `CHAINFR_DRIVE_DIR`: cloud drive directory
    /// - `CHAINFR_REQUEST_TIMEOUT_SECS`: HTTP timeout in seconds
    ///
    /// A `.env` file in the working directory is honored.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let network_str = env::var("CHAINFR_NETWORK")
            .unwrap_or_else(|_| "testnet".to_string())
            .to_lowercase();
        let network = parse_network(&network_str);

        let api_url = env::var("CHAINFR_API_URL").unwrap_or_else(|_| {
            log::info!("API URL: {} (default)", DEFAULT_API_URL);
            DEFAULT_API_URL.to_string()
        });

        let drive_dir = env::var("CHAINFR_DRIVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DRIVE_DIR));
        log::info!("Cloud drive directory: {}", drive_dir.display());

        let request_timeout = match env::var("CHAINFR_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw),
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Self {
            network,
            api_url,
            drive_dir,
            request_timeout,
        }
    }

    pub fn is_mainnet(&self) -> bool {
        self.network == Network::Mainnet
    }
}

fn parse_network(raw: &str) -> Network {
    match raw {
        "mainnet" => {
            log::info!("Using MAINNET");
            Network::Mainnet
        }
        "testnet" | "" => {
            log::info!("Using TESTNET");
            Network::Testnet
        }
        other => {
            log::warn!("Unknown network '{}', defaulting to Testnet", other);
            Network::Testnet
        }
    }
}

fn parse_timeout(raw: &str) -> Duration {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            log::warn!(
                "Invalid CHAINFR_REQUEST_TIMEOUT_SECS '{}', using {}s",
                raw,
                DEFAULT_REQUEST_TIMEOUT_SECS
            );
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        }
    }
}

impl Default for ClientConfig {
    /// Default configuration (Testnet, local API)
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            api_url: DEFAULT_API_URL.to_string(),
            drive_dir: PathBuf::from(DEFAULT_DRIVE_DIR),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_testnet() {
        let config = ClientConfig::default();
        assert_eq!(config.network, Network::Testnet);
        assert!(!config.is_mainnet());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_parse_network() {
        assert_eq!(parse_network("mainnet"), Network::Mainnet);
        assert_eq!(parse_network("testnet"), Network::Testnet);
        assert_eq!(parse_network("ropsten"), Network::Testnet);
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        assert_eq!(parse_timeout("5"), Duration::from_secs(5));
        assert_eq!(parse_timeout("0"), Duration::from_secs(30));
        assert_eq!(parse_timeout("soon"), Duration::from_secs(30));
    }
}
