//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Cannot read configuration file '{path}': {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Configuration file '{path}' is not valid TOML: {reason}")]
    InvalidToml { path: String, reason: String },

    /// A setting the automation flow cannot run without is empty
    #[error("Setting '{section}.{field}' is required")]
    MissingField { section: String, field: String },

    #[error("Setting '{field}' = '{value}' is invalid: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// An environment variable override could not be applied
    #[error("Environment variable {variable} is invalid: {reason}")]
    InvalidOverride { variable: String, reason: String },
}

impl ConfigurationError {
    pub fn unreadable(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Unreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_toml(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidToml {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn missing_field(section: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            section: section.into(),
            field: field.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_override(variable: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOverride {
            variable: variable.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
