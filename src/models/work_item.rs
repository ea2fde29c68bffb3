//! # Work Items
//!
//! [`WorkItem`] is the submission descriptor. [`WorkItemRecord`] is the lenient
//! read model for status lookups: only the fields the poller inspects are
//! decoded, and everything else the remote API returns is ignored.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{odata, parameters};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkItem {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    pub activity_id: String,
    pub arguments: Arguments,
    #[serde(rename = "AvailabilityZone@odata.type")]
    pub availability_zone_odata_type: String,
    pub availability_zone: Option<String>,
    // Field names follow the remote schema, including its spelling
    pub bytes_tranferred_in: Option<i64>,
    pub bytes_tranferred_out: Option<i64>,
    pub id: String,
    #[serde(rename = "Status@odata.type")]
    pub status_odata_type: String,
    pub status: Option<String>,
    pub status_details: Option<StatusDetails>,
    pub time_input_transfer_started: Option<String>,
    pub time_output_transfer_ended: Option<String>,
    pub time_queued: Option<String>,
    pub time_script_ended: Option<String>,
    pub time_script_started: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Arguments {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    #[serde(rename = "InputArguments@odata.type")]
    pub input_arguments_odata_type: String,
    pub input_arguments: Vec<Argument>,
    #[serde(rename = "OutputArguments@odata.type")]
    pub output_arguments_odata_type: String,
    pub output_arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Argument {
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    #[serde(rename = "Headers@odata.type")]
    pub headers_odata_type: String,
    pub headers: Vec<serde_json::Value>,
    #[serde(rename = "HttpVerb@odata.type")]
    pub http_verb_odata_type: String,
    pub http_verb: Option<String>,
    pub name: String,
    pub resource: Option<String>,
    #[serde(rename = "ResourceKind@odata.type")]
    pub resource_kind_odata_type: String,
    pub resource_kind: Option<String>,
    #[serde(rename = "StorageProvider@odata.type")]
    pub storage_provider_odata_type: String,
    pub storage_provider: String,
}

impl Argument {
    fn new(name: &str) -> Self {
        Self {
            odata_type: odata::ARGUMENT.to_string(),
            headers_odata_type: odata::HEADER_COLLECTION.to_string(),
            headers: Vec::new(),
            http_verb_odata_type: odata::HTTP_VERB_TYPE.to_string(),
            http_verb: None,
            name: name.to_string(),
            resource: None,
            resource_kind_odata_type: odata::RESOURCE_KIND.to_string(),
            resource_kind: None,
            storage_provider_odata_type: odata::STORAGE_PROVIDER.to_string(),
            storage_provider: parameters::STORAGE_PROVIDER_GENERIC.to_string(),
        }
    }

    /// The drawing the job opens, fetched from a signed read URL
    pub fn host_drawing(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::new(parameters::HOST_DRAWING)
        }
    }

    /// Empty embedded parameters file
    pub fn empty_params() -> Self {
        Self {
            resource: Some(parameters::EMPTY_PARAMS_RESOURCE.to_string()),
            resource_kind: Some(parameters::RESOURCE_KIND_EMBEDDED.to_string()),
            ..Self::new(parameters::PARAMS)
        }
    }

    /// Result bundle, delivered as a zip package the remote API hosts
    pub fn results() -> Self {
        Self {
            http_verb: Some(parameters::HTTP_VERB_POST.to_string()),
            resource_kind: Some(parameters::RESOURCE_KIND_ZIP_PACKAGE.to_string()),
            ..Self::new(parameters::RESULTS)
        }
    }
}

impl WorkItem {
    /// Job descriptor running `activity_id` against the drawing at `drawing_url`
    pub fn new(activity_id: impl Into<String>, drawing_url: impl Into<String>) -> Self {
        Self {
            odata_type: odata::WORK_ITEM.to_string(),
            activity_id: activity_id.into(),
            arguments: Arguments {
                odata_type: odata::ARGUMENTS.to_string(),
                input_arguments_odata_type: odata::ARGUMENT_COLLECTION.to_string(),
                input_arguments: vec![
                    Argument::host_drawing(drawing_url),
                    Argument::empty_params(),
                ],
                output_arguments_odata_type: odata::ARGUMENT_COLLECTION.to_string(),
                output_arguments: vec![Argument::results()],
            },
            availability_zone_odata_type: odata::DATA_AFFINITY.to_string(),
            availability_zone: None,
            bytes_tranferred_in: None,
            bytes_tranferred_out: None,
            id: String::new(),
            status_odata_type: odata::EXECUTION_STATUS.to_string(),
            status: None,
            status_details: None,
            time_input_transfer_started: None,
            time_output_transfer_ended: None,
            time_queued: None,
            time_script_ended: None,
            time_script_started: None,
            timestamp: parameters::NEW_DESCRIPTOR_TIMESTAMP.to_string(),
        }
    }
}

/// Remote execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkItemStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    /// Any status string this crate does not know; treated as a failure
    #[serde(other)]
    Unknown,
}

impl WorkItemStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkItemStatus::Pending | WorkItemStatus::InProgress)
    }
}

impl fmt::Display for WorkItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkItemStatus::Pending => "Pending",
            WorkItemStatus::InProgress => "InProgress",
            WorkItemStatus::Succeeded => "Succeeded",
            WorkItemStatus::Failed => "Failed",
            WorkItemStatus::Unknown => "Unknown",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusDetails {
    /// URL of the execution report
    #[serde(default)]
    pub report: Option<String>,
}

/// Status lookup response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkItemRecord {
    pub status: WorkItemStatus,
    #[serde(default)]
    pub arguments: Option<RecordArguments>,
    #[serde(default)]
    pub status_details: Option<StatusDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordArguments {
    #[serde(default)]
    pub output_arguments: Vec<RecordArgument>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordArgument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
}

impl WorkItemRecord {
    /// Resource of the first declared output argument
    pub fn output_resource(&self) -> Option<&str> {
        self.arguments
            .as_ref()
            .and_then(|args| args.output_arguments.first())
            .and_then(|arg| arg.resource.as_deref())
    }

    pub fn report(&self) -> Option<&str> {
        self.status_details
            .as_ref()
            .and_then(|details| details.report.as_deref())
    }
}

/// Submission response; only the assigned identifier matters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmittedWorkItem {
    #[serde(rename = "Id")]
    pub id: String,
}
