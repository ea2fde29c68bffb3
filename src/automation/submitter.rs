//! Work item submission.

use tracing::{info, instrument};

use crate::api_clients::DesignAutomationClient;
use crate::error::AutomationResult;
use crate::models::WorkItem;

#[derive(Debug)]
pub struct WorkItemSubmitter<'a> {
    client: &'a DesignAutomationClient,
}

impl<'a> WorkItemSubmitter<'a> {
    pub fn new(client: &'a DesignAutomationClient) -> Self {
        Self { client }
    }

    /// Start `activity` against the drawing at `input_url`, returning the
    /// remote work item id. A rejected submission is not retried.
    #[instrument(skip(self, input_url))]
    pub async fn submit(&self, activity: &str, input_url: &str) -> AutomationResult<String> {
        let work_item = WorkItem::new(activity, input_url);
        let submitted = self.client.submit_work_item(&work_item).await?;

        info!(activity = %activity, work_item_id = %submitted.id, "Submitted work item");
        Ok(submitted.id)
    }
}
