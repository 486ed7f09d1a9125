use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::Json as ResponseJson,
    routing::get,
};
use deployment::Deployment;
use serde::{Deserialize, Serialize};
use services::services::shortcuts::Shortcut;
use utils::response::ApiResponse;

use crate::{DeploymentImpl, error::ApiError};

#[derive(Debug, Serialize)]
pub struct ShortcutList {
    pub shortcuts: Vec<Shortcut>,
}

#[derive(Debug, Deserialize)]
pub struct SaveShortcutsRequest {
    #[serde(default)]
    pub shortcuts: Option<Vec<Shortcut>>,
}

pub async fn get_shortcuts(
    State(deployment): State<DeploymentImpl>,
) -> Result<ResponseJson<ApiResponse<ShortcutList>>, ApiError> {
    let loaded = deployment.shortcuts().load().await?;
    let message = if loaded.created_defaults {
        "Default shortcuts loaded"
    } else {
        "Shortcuts loaded successfully"
    };

    Ok(ResponseJson(ApiResponse::success_with_message(
        ShortcutList {
            shortcuts: loaded.shortcuts,
        },
        message,
    )))
}

pub async fn save_shortcuts(
    State(deployment): State<DeploymentImpl>,
    payload: Result<Json<SaveShortcutsRequest>, JsonRejection>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let Json(payload) = payload?;
    let Some(shortcuts) = payload.shortcuts else {
        return Err(ApiError::BadRequest(
            "Invalid shortcuts data. Expected an array.".to_string(),
        ));
    };

    deployment.shortcuts().save(&shortcuts).await?;

    tracing::info!(count = shortcuts.len(), "Shortcuts saved");
    Ok(ResponseJson(ApiResponse::message(
        "Shortcuts saved successfully",
    )))
}

pub fn router() -> Router<DeploymentImpl> {
    Router::new().route("/shortcuts", get(get_shortcuts).post(save_shortcuts))
}
