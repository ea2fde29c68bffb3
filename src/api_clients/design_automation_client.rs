//! # Design Automation API Client
//!
//! Thin client over the remote workflow API's OData endpoints. Each call maps
//! to one HTTP request through the shared [`HttpTransport`]; status codes are
//! interpreted here, per endpoint, and nothing is retried.

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::auth::AccessToken;
use crate::config::ApiConfig;
use crate::error::{AutomationError, AutomationResult};
use crate::models::{Activity, AppPackage, SubmittedWorkItem, WorkItem};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Point lookup URL for a named resource: `<collection>('<id>')`
pub fn point_url(collection: &str, id: &str) -> String {
    format!("{collection}('{id}')")
}

#[derive(Debug, Deserialize)]
struct UploadUrlResponse {
    value: Option<String>,
}

/// Client bound to one access token
#[derive(Clone)]
pub struct DesignAutomationClient {
    transport: Arc<dyn HttpTransport>,
    config: ApiConfig,
    token: AccessToken,
}

impl std::fmt::Debug for DesignAutomationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignAutomationClient")
            .field("package_endpoint", &self.config.package_endpoint)
            .field("activity_endpoint", &self.config.activity_endpoint)
            .field("workitem_endpoint", &self.config.workitem_endpoint)
            .finish_non_exhaustive()
    }
}

impl DesignAutomationClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: ApiConfig, token: AccessToken) -> Self {
        Self {
            transport,
            config,
            token,
        }
    }

    /// Transport used for unauthenticated transfers (bundle download, upload)
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    async fn send(&self, request: HttpRequest) -> AutomationResult<HttpResponse> {
        self.transport
            .execute(request.with_authorization(self.token.header_value()))
            .await
    }

    async fn exists(&self, collection: &str, id: &str) -> AutomationResult<bool> {
        let url = point_url(collection, id);
        let response = self.send(HttpRequest::get(&url)).await?;
        debug!(url = %url, status = response.status, "Existence check");
        Ok(response.is_ok())
    }

    async fn delete(&self, collection: &str, id: &str, operation: &str) -> AutomationResult<()> {
        let url = point_url(collection, id);
        self.send(HttpRequest::delete(&url))
            .await?
            .require(operation, HttpResponse::is_deleted)?;
        info!(url = %url, "Deleted remote resource");
        Ok(())
    }

    async fn create<T: serde::Serialize>(
        &self,
        collection: &str,
        descriptor: &T,
        operation: &str,
    ) -> AutomationResult<HttpResponse> {
        let body = serde_json::to_value(descriptor).map_err(|e| {
            AutomationError::invalid_input(format!("{operation}: unserializable descriptor: {e}"))
        })?;

        self.send(HttpRequest::post(collection).with_json(body))
            .await?
            .require(operation, HttpResponse::is_created)
    }

    /// GET /AppPackages('<name>') answered 200
    pub async fn package_exists(&self, name: &str) -> AutomationResult<bool> {
        self.exists(&self.config.package_endpoint, name).await
    }

    /// GET /Activities('<name>') answered 200
    pub async fn activity_exists(&self, name: &str) -> AutomationResult<bool> {
        self.exists(&self.config.activity_endpoint, name).await
    }

    /// Ask the remote API where a new package bundle should be uploaded
    pub async fn package_upload_url(&self) -> AutomationResult<String> {
        let operation = "get package upload url";
        let response = self
            .send(HttpRequest::get(&self.config.package_upload_endpoint))
            .await?
            .require(operation, HttpResponse::is_ok)?;

        match response.json::<UploadUrlResponse>(operation)?.value {
            Some(url) if !url.is_empty() => Ok(url),
            _ => {
                error!(body = %response.text(), "Upload url response carried no value");
                Err(AutomationError::invalid_response(
                    operation,
                    "response has no 'value'",
                ))
            }
        }
    }

    pub async fn create_package(&self, package: &AppPackage) -> AutomationResult<()> {
        self.create(&self.config.package_endpoint, package, "create package")
            .await?;
        info!(package = %package.id, "Created app package");
        Ok(())
    }

    pub async fn create_activity(&self, activity: &Activity) -> AutomationResult<()> {
        self.create(&self.config.activity_endpoint, activity, "create activity")
            .await?;
        info!(activity = %activity.id, "Created activity");
        Ok(())
    }

    pub async fn delete_package(&self, name: &str) -> AutomationResult<()> {
        self.delete(&self.config.package_endpoint, name, "delete package")
            .await
    }

    pub async fn delete_activity(&self, name: &str) -> AutomationResult<()> {
        self.delete(&self.config.activity_endpoint, name, "delete activity")
            .await
    }

    /// POST /WorkItems, returning the identifier the remote API assigned
    pub async fn submit_work_item(
        &self,
        work_item: &WorkItem,
    ) -> AutomationResult<SubmittedWorkItem> {
        let operation = "submit work item";
        let response = self
            .create(&self.config.workitem_endpoint, work_item, operation)
            .await?;

        let submitted: SubmittedWorkItem = response.json(operation)?;
        if submitted.id.is_empty() {
            return Err(AutomationError::invalid_response(
                operation,
                "response has an empty 'Id'",
            ));
        }
        Ok(submitted)
    }

    /// Raw status lookup; the caller interprets the status code
    pub async fn fetch_work_item(&self, id: &str) -> AutomationResult<HttpResponse> {
        let url = point_url(&self.config.workitem_endpoint, id);
        self.send(HttpRequest::get(url)).await
    }
}
