use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use services::services::{
    template::{TemplateValidation, default_template, validate_template},
    template_store::StoredTemplate,
};
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct TemplateContentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateList {
    pub templates: Vec<StoredTemplate>,
}

#[derive(Debug, Serialize)]
pub struct DefaultTemplate {
    pub content: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SavedTemplate {
    pub path: String,
}

pub async fn list_templates(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<TemplateList>>, ApiError> {
    let templates = deployment.templates().list().await?;
    Ok(ResponseJson(ApiResponse::success(TemplateList { templates })))
}

pub async fn get_default_template() -> ResponseJson<ApiResponse<DefaultTemplate>> {
    ResponseJson(ApiResponse::success(DefaultTemplate {
        content: default_template(),
    }))
}

pub async fn save_template(
    State(deployment): State<DeploymentImpl>,
    payload: Result<Json<SaveTemplateRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<SavedTemplate>>, ApiError> {
    let Json(payload) = payload?;
    let path = deployment
        .templates()
        .save(&payload.name, &payload.content)
        .await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        SavedTemplate {
            path: path.to_string_lossy().into_owned(),
        },
        "Template saved successfully",
    )))
}

pub async fn delete_template(
    State(deployment): State<DeploymentImpl>,
    Path(name): Path<String>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    deployment.templates().delete(&name).await?;
    Ok(ResponseJson(ApiResponse::message(
        "Template deleted successfully",
    )))
}

pub async fn validate(
    payload: Result<Json<TemplateContentRequest>, JsonRejection>,
) -> Result<ResponseJson<TemplateValidation>, ApiError> {
    let Json(payload) = payload?;
    Ok(ResponseJson(validate_template(&payload.content)))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new()
        .route("/templates", get(list_templates).post(save_template))
        .route("/default-template", get(get_default_template))
        .route("/templates/validate", post(validate))
        .route("/templates/{name}", delete(delete_template))
}
