use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::Json as ResponseJson,
    routing::post,
};
use deployment::Deployment;
use serde::Serialize;
use services::services::{installer::InstallReport, template::validate_template};

use super::templates::TemplateContentRequest;
use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Serialize)]
pub struct InstallResponse {
    pub success: bool,
    pub report: InstallReport,
}

/// Validate a YAML template and run its enabled steps in order.
pub async fn install_template(
    State(deployment): State<DeploymentImpl>,
    payload: Result<Json<TemplateContentRequest>, JsonRejection>,
) -> Result<ResponseJson<InstallResponse>, ApiError> {
    let Json(payload) = payload?;

    let validation = validate_template(&payload.content);
    let Some(template) = validation.data else {
        return Err(ApiError::BadRequest(validation.message));
    };

    tracing::info!(
        template = %template.name,
        commands = template.command_count(),
        "Installing template"
    );
    let report = deployment.installer().install(&template).await;

    Ok(ResponseJson(InstallResponse {
        success: report.success,
        report,
    }))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new().route("/install", post(install_template))
}
