//! Configuration for Hearth
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Hearth - personal command center
#[derive(Parser, Debug, Clone)]
#[command(name = "hearth")]
#[command(about = "REST + WebSocket hub over JSON-backed collections")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3456")]
    pub listen: SocketAddr,

    /// Directory holding the JSON collection documents
    #[arg(long, env = "DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Directory of memory files served read-only
    #[arg(long, env = "MEMORY_DIR", default_value = "./memory")]
    pub memory_dir: PathBuf,

    /// Workspace directory scanned by the storage report
    #[arg(long, env = "WORKSPACE_DIR", default_value = ".")]
    pub workspace_dir: PathBuf,

    /// Base URL of the external trading service
    #[arg(long, env = "TRADING_URL", default_value = "http://localhost:3457")]
    pub trading_url: String,

    /// Timeout for proxied trading requests in milliseconds
    #[arg(long, env = "TRADING_TIMEOUT_MS", default_value = "5000")]
    pub trading_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.trading_url.trim().is_empty() {
            return Err("TRADING_URL must not be empty".to_string());
        }
        if self.trading_timeout_ms == 0 {
            return Err("TRADING_TIMEOUT_MS must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Defaults for unit tests; the trading URL points at a closed port on
    /// purpose.
    #[cfg(test)]
    pub fn test_defaults() -> Self {
        Self {
            listen: "127.0.0.1:0".parse().unwrap(),
            data_dir: PathBuf::from("./data"),
            memory_dir: PathBuf::from("./memory"),
            workspace_dir: PathBuf::from("."),
            trading_url: "http://127.0.0.1:9".to_string(),
            trading_timeout_ms: 500,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Args::test_defaults().validate().is_ok());
    }

    #[test]
    fn test_empty_trading_url_is_rejected() {
        let mut args = Args::test_defaults();
        args.trading_url = " ".to_string();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut args = Args::test_defaults();
        args.trading_timeout_ms = 0;
        assert!(args.validate().is_err());
    }
}
