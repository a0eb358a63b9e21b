use std::time::Duration;

use url::Url;

use crate::error::{DashError, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Connection settings for the dashboard backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Config {
    /// Builds a config from the raw CLI/env values.
    ///
    /// The base URL is normalised to end in `/` so that endpoint paths join
    /// underneath any prefix (`http://host/dash` serves `http://host/dash/api/...`).
    pub fn new(api_url: &str, timeout_secs: Option<u64>) -> Result<Self> {
        let mut api_url = Url::parse(api_url)
            .map_err(|e| DashError::Config(format!("Invalid API URL '{api_url}': {e}")))?;

        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(DashError::Config(format!(
                "Unsupported URL scheme '{}', expected http or https",
                api_url.scheme()
            )));
        }

        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        let timeout = match timeout_secs {
            Some(0) => {
                return Err(DashError::Config(
                    "Timeout must be at least one second".to_string(),
                ))
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            api_url,
            timeout,
            user_agent: format!("deliverylens/{}", env!("CARGO_PKG_VERSION")),
        })
    }
}
