// Configuration passed into `VisionClient` at construction time. Nothing
// here is global: `main` builds a `ClientConfig` (usually from the
// environment) and hands it over.

use crate::error::{VisionError, VisionResult};
use std::time::Duration;

/// Query string selecting the visual features returned by the service.
pub const VISUAL_FEATURES: &str = "Categories,Description,Color";

/// Path of the analyze operation, relative to the endpoint.
pub const ANALYZE_PATH: &str = "vision/v2.1/analyze";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Subscription key and endpoint for the vision service. Only checked for
/// presence, the service itself decides whether they are valid.
#[derive(Clone)]
pub struct Credentials {
    subscription_key: String,
    endpoint: String,
}

impl Credentials {
    pub fn new(
        subscription_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> VisionResult<Self> {
        let subscription_key = subscription_key.into();
        let endpoint = endpoint.into();
        if subscription_key.trim().is_empty() {
            return Err(VisionError::MissingCredential("subscription key"));
        }
        if endpoint.trim().is_empty() {
            return Err(VisionError::MissingCredential("endpoint"));
        }
        Ok(Credentials {
            subscription_key,
            endpoint,
        })
    }

    pub fn subscription_key(&self) -> &str {
        &self.subscription_key
    }

    /// Full analyze URL. A trailing slash on the endpoint is tolerated.
    pub fn analyze_url(&self) -> String {
        format!(
            "{}/{}?visualFeatures={}",
            self.endpoint.trim().trim_end_matches('/'),
            ANALYZE_PATH,
            VISUAL_FEATURES
        )
    }
}

// Keep the key out of debug output and logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("subscription_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    /// Upper bound for the whole request, including reading the body.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        ClientConfig {
            credentials,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a config from `VISION_SUBSCRIPTION_KEY`, `VISION_ENDPOINT` and
    /// the optional `VISION_TIMEOUT_SECS`.
    pub fn from_env() -> VisionResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`. A timeout
    /// that is unparseable or zero falls back to `DEFAULT_TIMEOUT`.
    fn from_lookup<F>(lookup: F) -> VisionResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup("VISION_SUBSCRIPTION_KEY").unwrap_or_default();
        let endpoint = lookup("VISION_ENDPOINT").unwrap_or_default();
        let timeout = lookup("VISION_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        Ok(ClientConfig::new(Credentials::new(key, endpoint)?).with_timeout(timeout))
    }
}
