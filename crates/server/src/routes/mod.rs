use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::DeploymentImpl;

pub mod execute;
pub mod health;
pub mod install;
pub mod shortcuts;
pub mod system_info;
pub mod templates;

pub fn router(deployment: DeploymentImpl) -> Router {
    let base_routes = Router::new()
        .merge(execute::router())
        .merge(templates::router())
        .merge(install::router())
        .merge(shortcuts::router())
        .merge(system_info::router())
        .with_state(deployment);

    // Installer UI is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", base_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
