//! # Status Poller
//!
//! Checks a work item's status at a fixed interval until it reaches a terminal
//! state or the request budget runs out. The budget is sized to finish well
//! inside the gateway deadline in front of the status endpoint; running out is
//! reported as [`PollOutcome::Pending`] so the caller can ask again later.
//!
//! The poll is a plain future: dropping it stops polling.

use tracing::{debug, info, instrument, warn};

use crate::api_clients::DesignAutomationClient;
use crate::config::PollerConfig;
use crate::models::{WorkItemRecord, WorkItemStatus};

/// Result of a bounded status poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Still running after the last permitted request
    Pending,
    Succeeded {
        /// Result archive URL, exactly as the remote API reported it
        output: String,
        report: Option<String>,
    },
    Failed { report: Option<String> },
    /// The status lookup itself failed; `detail` is the raw response body, or
    /// the network error when no response arrived
    TransportError { status: Option<u16>, detail: String },
}

impl PollOutcome {
    pub fn status_text(&self) -> &'static str {
        match self {
            PollOutcome::Pending => "Pending",
            PollOutcome::Succeeded { .. } => "Succeeded",
            PollOutcome::Failed { .. } | PollOutcome::TransportError { .. } => "Failed",
        }
    }
}

#[derive(Debug)]
pub struct StatusPoller<'a> {
    client: &'a DesignAutomationClient,
    config: &'a PollerConfig,
}

impl<'a> StatusPoller<'a> {
    pub fn new(client: &'a DesignAutomationClient, config: &'a PollerConfig) -> Self {
        Self { client, config }
    }

    /// Poll until terminal, issuing at most `max_polls` status requests
    #[instrument(skip(self))]
    pub async fn poll(&self, work_item_id: &str) -> PollOutcome {
        let max_polls = self.config.max_polls;

        for attempt in 1..=max_polls {
            if let Some(outcome) = self.check(work_item_id, attempt).await {
                return outcome;
            }

            if attempt < max_polls {
                tokio::time::sleep(self.config.interval()).await;
            }
        }

        info!(
            work_item_id = %work_item_id,
            polls = max_polls,
            "Work item still running, poll budget exhausted"
        );
        PollOutcome::Pending
    }

    /// One status request; `None` while the work item is still running
    async fn check(&self, work_item_id: &str, attempt: u32) -> Option<PollOutcome> {
        let response = match self.client.fetch_work_item(work_item_id).await {
            Ok(response) => response,
            Err(e) => {
                warn!(work_item_id = %work_item_id, error = %e, "Status request failed");
                return Some(PollOutcome::TransportError {
                    status: None,
                    detail: e.to_string(),
                });
            }
        };

        if !response.is_ok() {
            warn!(
                work_item_id = %work_item_id,
                status = response.status,
                "Status request rejected"
            );
            return Some(PollOutcome::TransportError {
                status: Some(response.status),
                detail: response.text(),
            });
        }

        let record: WorkItemRecord = match response.json("get work item status") {
            Ok(record) => record,
            Err(e) => {
                warn!(work_item_id = %work_item_id, error = %e, "Unreadable status response");
                return Some(PollOutcome::TransportError {
                    status: Some(response.status),
                    detail: response.text(),
                });
            }
        };

        debug!(work_item_id = %work_item_id, attempt, status = %record.status, "Polled work item");

        match record.status {
            WorkItemStatus::Pending | WorkItemStatus::InProgress => None,
            WorkItemStatus::Succeeded => {
                let report = record.report().map(str::to_string);
                match record.output_resource() {
                    Some(output) => {
                        info!(work_item_id = %work_item_id, "Work item succeeded");
                        Some(PollOutcome::Succeeded {
                            output: output.to_string(),
                            report,
                        })
                    }
                    None => {
                        warn!(work_item_id = %work_item_id, "Succeeded work item has no output");
                        Some(PollOutcome::TransportError {
                            status: Some(response.status),
                            detail: response.text(),
                        })
                    }
                }
            }
            WorkItemStatus::Failed | WorkItemStatus::Unknown => {
                info!(work_item_id = %work_item_id, status = %record.status, "Work item failed");
                Some(PollOutcome::Failed {
                    report: record.report().map(str::to_string),
                })
            }
        }
    }
}
