//! # Backend Configuration Module
//!
//! Settings for reaching the hosted backend service.
//!
//! ## Environment Variables
//!
//! - `BACKEND_URL`: Base URL of the backend project (required)
//! - `BACKEND_ANON_KEY`: Public API key sent with every request (required)
//! - `BACKEND_REQUEST_TIMEOUT_SECONDS`: HTTP request timeout (default: 30)

use std::env;
use std::time::Duration;

use eyre::{Result, WrapErr};

/// Configuration for the backend client
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use seniorcare_sync::config::BackendConfig;
///
/// fn example() -> Result<()> {
///     let config = BackendConfig::from_env()?;
///     println!("Using backend at {}", config.rest_url());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. "https://project.example.co"
    pub url: String,

    /// Public API key
    pub anon_key: String,

    /// Request timeout
    pub request_timeout: Duration,
}

impl BackendConfig {
    /// Creates a new BackendConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if `BACKEND_URL` or
    /// `BACKEND_ANON_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let url = env::var("BACKEND_URL").wrap_err("BACKEND_URL environment variable must be set")?;
        let anon_key = env::var("BACKEND_ANON_KEY")
            .wrap_err("BACKEND_ANON_KEY environment variable must be set")?;

        let request_timeout = env::var("BACKEND_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            url,
            anon_key,
            request_timeout: Duration::from_secs(request_timeout),
        })
    }

    /// Root of the row-level REST API
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }
}
