//! Job submission endpoint
//!
//! POST /run validates the request, runs one separation job and maps the
//! tool's exit code to the response. The request is held open until the
//! tool exits.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use demucs_common::api::authorize;

use crate::error::{ApiError, ApiResult};
use crate::job::{self, JobOutcome, ProjectId, RunRequest};
use crate::AppState;

/// Successful job response
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub status: &'static str,
    pub id_projet: Option<ProjectId>,
}

/// POST /run
pub async fn run_job(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<RunResponse>> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    if !body.is_object() {
        return Err(ApiError::InvalidBody(
            "request body must be a JSON object".to_string(),
        ));
    }

    // Auth runs on the raw body, before any field is interpreted
    let provided = body.get("api_key").and_then(Value::as_str);
    if let Err(e) = authorize(state.config.api_key.as_ref(), provided) {
        warn!("Rejected job request: {}", e);
        return Err(ApiError::Unauthorized);
    }

    // Fields are raw JSON values here; presence and type are judged by validate()
    let request: RunRequest =
        serde_json::from_value(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    let spec = request.validate()?;

    let job_id = Uuid::new_v4();
    let span = info_span!("job", %job_id);
    let id_projet = spec.id_projet.clone();
    let config = state.config.clone();

    // Not cancelled if the client goes away: the job finishes and cleans up
    let outcome = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        info!(audio_url = %spec.audio_url, "Starting separation job");
        job::execute(&config.tool, &config.work_root, &spec, |line| {
            info!(target: "demucs_gateway::tool", "{}", line)
        })
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Job task failed: {}", e)))??;

    match outcome {
        JobOutcome::Completed => Ok(Json(RunResponse {
            status: "completed",
            id_projet,
        })),
        JobOutcome::Failed { exit_code } => Err(ApiError::ToolFailed { exit_code }),
    }
}
