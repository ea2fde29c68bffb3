//! # Token Provider
//!
//! Exchanges the configured client credential pair for a bearer token with a
//! `client_credentials` grant. Tokens are fetched per invocation and never cached.

use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::ApiConfig;
use crate::error::{AutomationError, AutomationResult};
use crate::transport::{HttpRequest, HttpTransport};

/// Ready-to-send `Authorization` header value, e.g. `Bearer eyJ...`
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token_type: &str, access_token: &str) -> Self {
        Self(format!("{token_type} {access_token}"))
    }

    pub fn header_value(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_type: Option<String>,
    access_token: Option<String>,
}

pub struct TokenProvider {
    transport: Arc<dyn HttpTransport>,
    config: ApiConfig,
}

impl TokenProvider {
    pub fn new(transport: Arc<dyn HttpTransport>, config: ApiConfig) -> Self {
        Self { transport, config }
    }

    /// Fetch a fresh token
    ///
    /// Every failure (network, non-JSON body, missing fields) is an
    /// [`AutomationError::AuthFailure`] carrying the cause.
    pub async fn fetch_token(&self) -> AutomationResult<AccessToken> {
        if self.config.client_id.is_empty() || self.config.client_secret.is_empty() {
            return Err(AutomationError::auth_failure(
                "client credentials are not configured",
            ));
        }

        let form = vec![
            ("client_id".to_string(), self.config.client_id.clone()),
            ("client_secret".to_string(), self.config.client_secret.clone()),
            ("grant_type".to_string(), "client_credentials".to_string()),
            ("scope".to_string(), self.config.scope.clone()),
        ];

        debug!(url = %self.config.auth_endpoint, "Requesting access token");

        let response = self
            .transport
            .execute(HttpRequest::post(&self.config.auth_endpoint).with_form(form))
            .await
            .map_err(|e| {
                error!(error = %e, "Token request failed");
                AutomationError::auth_failure(format!("token request failed: {e}"))
            })?;

        let parsed: TokenResponse = serde_json::from_slice(&response.body).map_err(|e| {
            error!(status = response.status, "Token response was not JSON");
            AutomationError::auth_failure(format!(
                "token endpoint answered HTTP {} with an unreadable body: {e}",
                response.status
            ))
        })?;

        match (parsed.token_type, parsed.access_token) {
            (Some(token_type), Some(access_token))
                if !token_type.is_empty() && !access_token.is_empty() =>
            {
                info!("Obtained access token");
                Ok(AccessToken::new(&token_type, &access_token))
            }
            _ => {
                error!(
                    status = response.status,
                    body = %response.text(),
                    "Token response carried no token"
                );
                Err(AutomationError::auth_failure(format!(
                    "token endpoint answered HTTP {} without a token",
                    response.status
                )))
            }
        }
    }
}
