//! # Work Item Handlers
//!
//! Upload locations, submission, status and result processing. Request field
//! names accept both the camelCase form and the lowercase form older clients
//! send; responses use the PascalCase keys the viewer page reads.

use axum::extract::{RawPathParams, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::automation::PollOutcome;
use crate::error::AutomationError;
use crate::web::errors::ApiResult;
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadLocationRequest {
    #[serde(default, alias = "dwgname")]
    pub drawing_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWorkItemRequest {
    #[serde(default, alias = "activityname")]
    pub activity_name: Option<String>,
    #[serde(default, alias = "dwglocation")]
    pub drawing_location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProcessResultRequest {
    #[serde(default, rename = "outputURL", alias = "output")]
    pub output_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultResponse {
    pub result: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusResponse {
    pub status_text: String,
    pub result: Value,
}

impl From<PollOutcome> for StatusResponse {
    fn from(outcome: PollOutcome) -> Self {
        let status_text = outcome.status_text().to_string();
        let result = match outcome {
            PollOutcome::Pending => Value::Null,
            PollOutcome::Succeeded { output, report } => {
                json!({ "Output": output, "Report": report })
            }
            PollOutcome::Failed { report } => json!({ "Report": report }),
            PollOutcome::TransportError { detail, .. } => Value::String(detail),
        };
        Self {
            status_text,
            result,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessResultResponse {
    pub result: Option<String>,
    pub custom_data: Option<String>,
}

/// Issue a signed upload URL: POST /v1/upload-location
pub async fn issue_upload_location(
    State(state): State<AppState>,
    request: Option<Json<UploadLocationRequest>>,
) -> ApiResult<Json<ResultResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let location = state
        .service
        .issue_upload_location(request.drawing_name.as_deref())
        .await?;

    Ok(Json(ResultResponse {
        result: location.url,
    }))
}

/// Provision and submit a work item: POST /v1/workitems
pub async fn submit_work_item(
    State(state): State<AppState>,
    request: Option<Json<SubmitWorkItemRequest>>,
) -> ApiResult<Json<ResultResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let id = state
        .service
        .submit_work_item(
            request.activity_name.as_deref(),
            request.drawing_location.as_deref(),
        )
        .await?;

    Ok(Json(ResultResponse { result: id }))
}

/// Bounded status poll: GET /v1/workitems/:id/status
///
/// The id is taken undecoded from the path; the service decodes it once.
pub async fn work_item_status(
    State(state): State<AppState>,
    params: RawPathParams,
) -> ApiResult<Json<StatusResponse>> {
    let raw_id = params
        .iter()
        .find(|(name, _)| *name == "id")
        .map(|(_, value)| value.to_string())
        .ok_or_else(|| AutomationError::invalid_input("invalid workitem id"))?;

    debug!(work_item_id = %raw_id, "Status requested");
    let outcome = state.service.work_item_status(&raw_id).await?;
    Ok(Json(outcome.into()))
}

/// Unpack a finished work item's output: POST /v1/results
pub async fn process_result(
    State(state): State<AppState>,
    request: Option<Json<ProcessResultRequest>>,
) -> ApiResult<Json<ProcessResultResponse>> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let outputs = state
        .service
        .process_result(request.output_url.as_deref())
        .await?;

    Ok(Json(ProcessResultResponse {
        result: outputs.primary,
        custom_data: outputs.custom_data,
    }))
}
