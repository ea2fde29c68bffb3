//! # Viewer Automation Configuration
//!
//! Explicit configuration value handed to every component at construction time.
//! Nothing in the crate reads configuration from ambient global state.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use viewer_automation::config::AutomationConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Defaults, then ./viewer-automation.toml, then environment overrides
//! let config = AutomationConfig::load(None)?;
//!
//! println!("Work items endpoint: {}", config.api.workitem_endpoint);
//! println!("Poll budget: {} x {}ms", config.poller.max_polls, config.poller.interval_ms);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::constants::{defaults, markers};

pub use error::{ConfigResult, ConfigurationError};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Remote workflow API endpoints and credentials
    pub api: ApiConfig,
    /// Executable package provisioned before first use
    pub package: PackageConfig,
    /// Activities a client may submit work items against
    pub activities: Vec<ActivityDefinition>,
    /// Blob store layout and signed URL settings
    pub storage: StorageConfig,
    /// Work item status polling budget
    pub poller: PollerConfig,
    /// Outbound HTTP client settings
    pub http: HttpConfig,
    /// Inbound HTTP service settings
    pub web: WebConfig,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            package: PackageConfig::default(),
            activities: defaults::activities(),
            storage: StorageConfig::default(),
            poller: PollerConfig::default(),
            http: HttpConfig::default(),
            web: WebConfig::default(),
        }
    }
}

/// Remote workflow API configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub auth_endpoint: String,
    pub package_endpoint: String,
    pub package_upload_endpoint: String,
    pub activity_endpoint: String,
    pub workitem_endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_endpoint: defaults::AUTH_ENDPOINT.to_string(),
            package_endpoint: defaults::PACKAGE_ENDPOINT.to_string(),
            package_upload_endpoint: defaults::PACKAGE_UPLOAD_ENDPOINT.to_string(),
            activity_endpoint: defaults::ACTIVITY_ENDPOINT.to_string(),
            workitem_endpoint: defaults::WORKITEM_ENDPOINT.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            scope: defaults::TOKEN_SCOPE.to_string(),
        }
    }
}

// Credentials never reach the logs
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("auth_endpoint", &self.auth_endpoint)
            .field("package_endpoint", &self.package_endpoint)
            .field("package_upload_endpoint", &self.package_upload_endpoint)
            .field("activity_endpoint", &self.activity_endpoint)
            .field("workitem_endpoint", &self.workitem_endpoint)
            .field("client_id", &mask(&self.client_id))
            .field("client_secret", &mask(&self.client_secret))
            .field("scope", &self.scope)
            .finish()
    }
}

fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "***"
    }
}

/// Package provisioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Name of the package this service owns
    pub name: String,
    /// Shared runtime package every activity also references
    pub reference_package: String,
    /// Where the package bundle bytes are downloaded from on first creation
    pub source_url: String,
    pub required_engine_version: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: defaults::PACKAGE_NAME.to_string(),
            reference_package: defaults::REFERENCE_PACKAGE_NAME.to_string(),
            source_url: String::new(),
            required_engine_version: defaults::REQUIRED_ENGINE_VERSION.to_string(),
        }
    }
}

/// A named activity and the script it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDefinition {
    pub name: String,
    pub script: String,
}

impl ActivityDefinition {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }
}

/// Blob store implementation the server runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobStoreBackend {
    /// Process-local store for development. Its URLs point at the bucket
    /// domain but nothing is ever written there.
    Memory,
}

impl std::str::FromStr for BlobStoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown blob store backend {other:?}")),
        }
    }
}

/// Blob store layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Must be chosen explicitly; there is no implicit fallback
    pub backend: Option<BlobStoreBackend>,
    pub bucket: String,
    /// Marker after which a signed URL carries the object key
    pub bucket_domain_marker: String,
    /// Folder marker for uploaded drawings
    pub upload_prefix: String,
    /// Folder marker for unpacked results
    pub results_prefix: String,
    pub default_drawing_name: String,
    pub signed_url_ttl_seconds: u64,
    pub max_concurrent_uploads: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: None,
            bucket: String::new(),
            bucket_domain_marker: markers::BUCKET_DOMAIN_MARKER.to_string(),
            upload_prefix: markers::DRAWING_FOLDER.to_string(),
            results_prefix: markers::RESULT_FOLDER.to_string(),
            default_drawing_name: defaults::DRAWING_NAME.to_string(),
            signed_url_ttl_seconds: defaults::SIGNED_URL_TTL_SECONDS,
            max_concurrent_uploads: defaults::MAX_CONCURRENT_UPLOADS,
        }
    }
}

impl StorageConfig {
    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_seconds)
    }
}

/// Status polling budget
///
/// The defaults keep one status request under the ~30s gateway deadline:
/// 11 checks with 2s between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    pub interval_ms: u64,
    pub max_polls: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: defaults::POLL_INTERVAL_MS,
            max_polls: defaults::MAX_POLLS,
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout; unset means the transport default
    pub timeout_ms: Option<u64>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            user_agent: format!("viewer-automation/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Inbound HTTP service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind_address: String,
    pub request_timeout_ms: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::BIND_ADDRESS.to_string(),
            request_timeout_ms: defaults::REQUEST_TIMEOUT_MS,
        }
    }
}

impl WebConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl AutomationConfig {
    /// Look up an activity definition by exact name
    pub fn activity(&self, name: &str) -> Option<&ActivityDefinition> {
        self.activities.iter().find(|a| a.name == name)
    }

    /// Validate the loaded configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let endpoints = [
            ("api.auth_endpoint", &self.api.auth_endpoint),
            ("api.package_endpoint", &self.api.package_endpoint),
            ("api.package_upload_endpoint", &self.api.package_upload_endpoint),
            ("api.activity_endpoint", &self.api.activity_endpoint),
            ("api.workitem_endpoint", &self.api.workitem_endpoint),
        ];
        for (field, value) in endpoints {
            if value.trim().is_empty() {
                return Err(ConfigurationError::missing_field("api", field));
            }
            if reqwest::Url::parse(value).is_err() {
                return Err(ConfigurationError::invalid_value(
                    field,
                    value.as_str(),
                    "must be an absolute URL",
                ));
            }
        }

        if self.package.name.trim().is_empty() {
            return Err(ConfigurationError::missing_field("package", "name"));
        }

        if self.activities.is_empty() {
            return Err(ConfigurationError::missing_field("root", "activities"));
        }
        if let Some(unnamed) = self.activities.iter().find(|a| a.name.trim().is_empty()) {
            return Err(ConfigurationError::invalid_value(
                "activities.name",
                unnamed.name.as_str(),
                "activity names cannot be empty",
            ));
        }

        if self.storage.bucket_domain_marker.is_empty() {
            return Err(ConfigurationError::missing_field(
                "storage",
                "bucket_domain_marker",
            ));
        }
        if self.storage.max_concurrent_uploads == 0 {
            return Err(ConfigurationError::invalid_value(
                "storage.max_concurrent_uploads",
                "0",
                "at least one upload must be allowed",
            ));
        }

        if self.poller.max_polls == 0 {
            return Err(ConfigurationError::invalid_value(
                "poller.max_polls",
                "0",
                "the poll budget must allow at least one status request",
            ));
        }

        Ok(())
    }
}
