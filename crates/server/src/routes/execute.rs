use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::Json as ResponseJson,
    routing::post,
};
use deployment::Deployment;
use executors::command::AggregateResult;
use serde::Deserialize;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub command: Option<String>,
}

/// Run every non-blank line of `command` in order and report the combined
/// result. A command that fails still answers 200 with `success: false`.
pub async fn execute_command(
    State(deployment): State<DeploymentImpl>,
    payload: Result<Json<ExecuteRequest>, JsonRejection>,
) -> Result<ResponseJson<AggregateResult>, ApiError> {
    let Json(payload) = payload?;
    let command = payload.command.unwrap_or_default();

    tracing::info!(command = %command, "Executing command");
    let result = deployment.executor().execute(&command).await?;

    Ok(ResponseJson(result))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new().route("/execute", post(execute_command))
}
