//! Configuration Loader
//!
//! Precedence (highest to lowest):
//! 1. Environment variables
//! 2. Config file (explicit path, else `./viewer-automation.toml`,
//!    else `./config/viewer-automation.toml`)
//! 3. Default values

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::error::{ConfigResult, ConfigurationError};
use super::AutomationConfig;
use crate::constants::env_vars;

const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

impl AutomationConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(explicit) => Self::load_from_file(explicit)?,
            None => match Self::find_config_file() {
                Some(found) => {
                    debug!("Loading config from: {}", found.display());
                    Self::load_from_file(&found)?
                }
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides_with(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            bucket = %config.storage.bucket,
            package = %config.package.name,
            activities = config.activities.len(),
            max_polls = config.poller.max_polls,
            poll_interval_ms = config.poller.interval_ms,
            "Configuration loaded successfully"
        );
        debug!(config = ?config, "Resolved configuration");

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let display = path.display().to_string();

        let metadata = std::fs::metadata(path)
            .map_err(|e| ConfigurationError::unreadable(display.as_str(), e))?;
        if !metadata.is_file() {
            return Err(ConfigurationError::invalid_value(
                "file_type",
                "directory or special file",
                "Configuration path must point to a regular file",
            ));
        }
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigurationError::invalid_value(
                "file_size",
                metadata.len().to_string(),
                "Configuration file exceeds 1MB",
            ));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::unreadable(display.as_str(), e))?;

        toml::from_str(&content).map_err(|e| ConfigurationError::invalid_toml(display, e))
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let possible_paths = [
            Path::new("./viewer-automation.toml"),
            Path::new("./config/viewer-automation.toml"),
        ];

        possible_paths
            .iter()
            .find(|path| path.is_file())
            .map(|path| path.to_path_buf())
    }

    /// Apply overrides from an environment lookup
    ///
    /// Takes the lookup as a closure so tests never touch process environment.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(env_vars::DEVELOPER_KEY) {
            self.api.client_id = key;
        }
        if let Some(secret) = lookup(env_vars::DEVELOPER_SECRET) {
            self.api.client_secret = secret;
        }
        if let Some(bucket) = lookup(env_vars::BUCKET) {
            self.storage.bucket = bucket;
        }
        if let Some(backend) = lookup(env_vars::BLOB_STORE) {
            self.storage.backend = Some(backend.parse().map_err(|reason| {
                ConfigurationError::invalid_override(env_vars::BLOB_STORE, reason)
            })?);
        }
        if let Some(source) = lookup(env_vars::PACKAGE_SOURCE_URL) {
            self.package.source_url = source;
        }
        if let Some(version) = lookup(env_vars::REQUIRED_ENGINE_VERSION) {
            self.package.required_engine_version = version;
        }
        if let Some(bind) = lookup(env_vars::BIND_ADDRESS) {
            self.web.bind_address = bind;
        }
        if let Some(interval) = lookup(env_vars::POLL_INTERVAL_MS) {
            self.poller.interval_ms = interval.parse().map_err(|e| {
                ConfigurationError::invalid_override(
                    env_vars::POLL_INTERVAL_MS,
                    format!("{interval:?} is not a number of milliseconds: {e}"),
                )
            })?;
        }
        if let Some(max_polls) = lookup(env_vars::MAX_POLLS) {
            self.poller.max_polls = max_polls.parse().map_err(|e| {
                ConfigurationError::invalid_override(
                    env_vars::MAX_POLLS,
                    format!("{max_polls:?} is not a poll count: {e}"),
                )
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlobStoreBackend;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("viewer-automation.toml");
        std::fs::write(
            &path,
            r#"
[storage]
backend = "memory"
bucket = "drawings-bucket"

[poller]
max_polls = 5
"#,
        )
        .unwrap();

        let config = AutomationConfig::load_from_file(&path).unwrap();
        assert_eq!(config.storage.bucket, "drawings-bucket");
        assert_eq!(config.storage.backend, Some(BlobStoreBackend::Memory));
        assert_eq!(config.poller.max_polls, 5);
        assert_eq!(config.poller.interval_ms, 2_000);
        assert_eq!(config.activities.len(), 2);
        assert_eq!(config.storage.upload_prefix, "drawings/");
    }

    #[test]
    fn test_load_custom_activities() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[[activities]]
name = "ExtractOnly"
script = "_indexextractor index.json\n"
"#,
        )
        .unwrap();

        let config = AutomationConfig::load_from_file(&path).unwrap();
        assert_eq!(config.activities.len(), 1);
        assert!(config.activity("ExtractOnly").is_some());
        assert!(config.activity("MyPublishActivity3d").is_none());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "[poller\nmax_polls = ").unwrap();

        let err = AutomationConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidToml { .. }));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let err = AutomationConfig::load_from_file(&temp_dir.path().join("absent.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::Unreadable { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ADSK_DEVELOPER_KEY", "client"),
            ("ADSK_DEVELOPER_SECRET", "secret"),
            ("DA_VIEWER_DWG_BUCKET", "env-bucket"),
            ("VIEWER_AUTOMATION_MAX_POLLS", "3"),
        ]);

        let mut config = AutomationConfig::default();
        config
            .apply_env_overrides_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.client_id, "client");
        assert_eq!(config.api.client_secret, "secret");
        assert_eq!(config.storage.bucket, "env-bucket");
        assert_eq!(config.poller.max_polls, 3);
    }

    #[test]
    fn test_env_override_rejects_garbage_numbers() {
        let mut config = AutomationConfig::default();
        let err = config
            .apply_env_overrides_with(|key| {
                (key == "VIEWER_AUTOMATION_POLL_INTERVAL_MS").then(|| "soon".to_string())
            })
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidOverride { .. }));
    }

    #[test]
    fn test_blob_store_backend_is_opt_in() {
        let mut config = AutomationConfig::default();
        assert_eq!(config.storage.backend, None);

        config
            .apply_env_overrides_with(|key| {
                (key == "VIEWER_AUTOMATION_BLOB_STORE").then(|| "Memory".to_string())
            })
            .unwrap();
        assert_eq!(config.storage.backend, Some(BlobStoreBackend::Memory));

        let err = config
            .apply_env_overrides_with(|key| {
                (key == "VIEWER_AUTOMATION_BLOB_STORE").then(|| "s3".to_string())
            })
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidOverride { .. }));
    }
}
