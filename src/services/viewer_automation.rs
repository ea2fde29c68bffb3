//! # Viewer Automation Service
//!
//! The four client-facing operations. Each call is self-contained: it fetches
//! its own access token, builds its own API client and keeps nothing around
//! once it returns.

use percent_encoding::percent_decode_str;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api_clients::DesignAutomationClient;
use crate::auth::TokenProvider;
use crate::automation::{
    PollOutcome, ResourceProvisioner, ResultUnpacker, StatusPoller, WorkItemSubmitter,
};
use crate::config::AutomationConfig;
use crate::error::{AutomationError, AutomationResult};
use crate::models::ExtractedOutputSet;
use crate::storage::{BlobStore, SignedUrlIssuer, UploadLocation};
use crate::transport::HttpTransport;

pub struct ViewerAutomationService {
    config: Arc<AutomationConfig>,
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn BlobStore>,
    issuer: SignedUrlIssuer,
}

impl std::fmt::Debug for ViewerAutomationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerAutomationService")
            .field("bucket", &self.store.bucket())
            .field("activities", &self.config.activities.len())
            .finish_non_exhaustive()
    }
}

impl ViewerAutomationService {
    pub fn new(
        config: Arc<AutomationConfig>,
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn BlobStore>,
    ) -> Self {
        let issuer = SignedUrlIssuer::new(store.clone(), config.storage.clone());
        Self {
            config,
            transport,
            store,
            issuer,
        }
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    async fn api_client(&self) -> AutomationResult<DesignAutomationClient> {
        let token = TokenProvider::new(self.transport.clone(), self.config.api.clone())
            .fetch_token()
            .await?;
        Ok(DesignAutomationClient::new(
            self.transport.clone(),
            self.config.api.clone(),
            token,
        ))
    }

    /// Signed write URL for a new drawing upload
    pub async fn issue_upload_location(
        &self,
        drawing_name: Option<&str>,
    ) -> AutomationResult<UploadLocation> {
        self.issuer.issue_upload_location(drawing_name).await
    }

    /// Provision on demand and start a work item for an uploaded drawing
    ///
    /// Input is validated before any network call.
    #[instrument(skip(self, drawing_location))]
    pub async fn submit_work_item(
        &self,
        activity_name: Option<&str>,
        drawing_location: Option<&str>,
    ) -> AutomationResult<String> {
        let activity = activity_name
            .and_then(|name| self.config.activity(name))
            .ok_or_else(|| AutomationError::invalid_input("invalid activity name"))?;

        let location = drawing_location
            .filter(|location| !location.is_empty())
            .ok_or_else(|| AutomationError::invalid_input("invalid drawing location"))?;

        let key = self.issuer.object_key_from(location)?;
        let read_url = self.issuer.issue_read_url(&key).await?;

        let client = self.api_client().await?;
        ResourceProvisioner::new(&client, &self.config.package)
            .ensure_all(&activity.name, &activity.script)
            .await?;

        let id = WorkItemSubmitter::new(&client)
            .submit(&activity.name, &read_url)
            .await?;

        info!(activity = %activity.name, key = %key, work_item_id = %id, "Work item started");
        Ok(id)
    }

    /// Bounded status poll for a work item id as received from the client
    ///
    /// A failed status lookup is an error carrying the remote diagnostic;
    /// running out of budget is the successful `Pending` outcome.
    #[instrument(skip(self))]
    pub async fn work_item_status(&self, work_item_id: &str) -> AutomationResult<PollOutcome> {
        let id = percent_decode_str(work_item_id)
            .decode_utf8()
            .map_err(|e| AutomationError::invalid_input(format!("invalid workitem id: {e}")))?;
        if id.trim().is_empty() {
            return Err(AutomationError::invalid_input("invalid workitem id"));
        }

        let client = self.api_client().await?;
        let outcome = StatusPoller::new(&client, &self.config.poller)
            .poll(&id)
            .await;

        match outcome {
            PollOutcome::TransportError {
                status: Some(status),
                detail,
            } => Err(AutomationError::upstream("get work item status", status, detail)),
            PollOutcome::TransportError {
                status: None,
                detail,
            } => Err(AutomationError::Transport {
                operation: "get work item status".to_string(),
                message: detail,
                timed_out: false,
            }),
            outcome => Ok(outcome),
        }
    }

    /// Unpack a finished work item's result archive under a fresh prefix
    #[instrument(skip(self, output_url))]
    pub async fn process_result(
        &self,
        output_url: Option<&str>,
    ) -> AutomationResult<ExtractedOutputSet> {
        let url = output_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| AutomationError::invalid_input("invalid url"))?;
        if reqwest::Url::parse(url).is_err() {
            return Err(AutomationError::invalid_input("invalid url"));
        }

        let prefix = format!("{}{}/", self.config.storage.results_prefix, Uuid::new_v4());
        let unpacker = ResultUnpacker::new(
            self.transport.clone(),
            self.store.clone(),
            self.config.storage.max_concurrent_uploads,
        );

        let outputs = unpacker.unpack(url, &prefix).await?;
        if outputs.primary.is_none() {
            warn!(prefix = %prefix, "Result has no viewable output");
        }
        Ok(outputs)
    }

    /// Remove the configured app package from the remote API
    pub async fn remove_package(&self) -> AutomationResult<()> {
        let client = self.api_client().await?;
        ResourceProvisioner::new(&client, &self.config.package)
            .delete_package(&self.config.package.name)
            .await
    }

    /// Remove a configured activity from the remote API
    pub async fn remove_activity(&self, name: &str) -> AutomationResult<()> {
        if self.config.activity(name).is_none() {
            return Err(AutomationError::invalid_input("invalid activity name"));
        }
        let client = self.api_client().await?;
        ResourceProvisioner::new(&client, &self.config.package)
            .delete_activity(name)
            .await
    }
}
