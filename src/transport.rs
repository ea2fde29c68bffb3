//! # HTTP Transport
//!
//! Generic transport used by every remote call. Requests are JSON, binary or
//! form-encoded, optionally carry an `Authorization` header, and every response
//! is normalized to a status code plus raw body bytes. Interpreting the status is
//! left to the caller, since the remote API accepts different codes per
//! operation (200 vs 200/201 vs 200/204).

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::HttpConfig;
use crate::error::{AutomationError, AutomationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        })
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Binary(Vec<u8>),
    Form(Vec<(String, String)>),
}

/// A transport-level request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Full `Authorization` header value, e.g. `Bearer abc`
    pub authorization: Option<String>,
    pub body: RequestBody,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            authorization: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    #[must_use]
    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    #[must_use]
    pub fn with_binary(mut self, bytes: Vec<u8>) -> Self {
        self.body = RequestBody::Binary(bytes);
        self
    }

    #[must_use]
    pub fn with_form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }
}

/// Normalized response: status plus raw body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// 200 or 201, the success set for create calls
    pub fn is_created(&self) -> bool {
        matches!(self.status, 200 | 201)
    }

    /// 200 or 204, the success set for delete calls
    pub fn is_deleted(&self) -> bool {
        matches!(self.status, 200 | 204)
    }

    /// Body as lossy UTF-8 text, for diagnostics
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self, operation: &str) -> AutomationResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            AutomationError::invalid_response(operation, format!("malformed JSON body: {e}"))
        })
    }

    /// Turn a response outside the accepted set into an upstream error
    pub fn require(
        self,
        operation: &str,
        accepted: fn(&HttpResponse) -> bool,
    ) -> AutomationResult<Self> {
        if accepted(&self) {
            Ok(self)
        } else {
            Err(AutomationError::upstream(operation, self.status, self.text()))
        }
    }
}

/// Abstraction over the outbound HTTP stack
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a request; network failures are errors, any HTTP status is a response
    async fn execute(&self, request: HttpRequest) -> AutomationResult<HttpResponse>;

    /// Unauthenticated binary download that requires a 200
    async fn download(&self, url: &str, operation: &str) -> AutomationResult<Vec<u8>> {
        let response = self
            .execute(HttpRequest::get(url))
            .await?
            .require(operation, HttpResponse::is_ok)?;
        Ok(response.body)
    }

    /// Unauthenticated binary PUT that requires a 200
    async fn upload(&self, url: &str, bytes: Vec<u8>, operation: &str) -> AutomationResult<()> {
        self.execute(HttpRequest::put(url).with_binary(bytes))
            .await?
            .require(operation, HttpResponse::is_ok)?;
        Ok(())
    }
}

/// reqwest-backed transport
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Build the HTTP client from configuration
    pub fn new(config: &HttpConfig) -> AutomationResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        let client = builder.build().map_err(|e| {
            AutomationError::invalid_input(format!("Failed to create HTTP client: {e}"))
        })?;

        info!(
            timeout_ms = ?config.timeout_ms,
            user_agent = %config.user_agent,
            "Created HTTP transport"
        );

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> AutomationResult<HttpResponse> {
        let HttpRequest {
            method,
            url,
            authorization,
            body,
        } = request;

        debug!(method = %method, url = %url, "Sending request");

        let mut builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        if let Some(value) = authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, value);
        }

        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Binary(bytes) => builder.body(bytes),
            RequestBody::Form(fields) => builder.form(&fields),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(method = %method, url = %url, status, bytes = body.len(), "Received response");

        Ok(HttpResponse { status, body })
    }
}
