use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use deployment::Deployment;
use serde::Serialize;
use services::services::system_info::{SystemInfo, system_info};
use utils::response::ApiResponse;

use crate::DeploymentImpl;

#[derive(Debug, Serialize)]
pub struct SystemInfoPayload {
    pub info: SystemInfo,
}

pub async fn get_system_info(
    State(deployment): State<DeploymentImpl>,
) -> ResponseJson<ApiResponse<SystemInfoPayload>> {
    let info = system_info(deployment.executor()).await;
    ResponseJson(ApiResponse::success(SystemInfoPayload { info }))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new().route("/system-info", get(get_system_info))
}
