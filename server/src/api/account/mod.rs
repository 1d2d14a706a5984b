pub mod logout;
pub mod update_password;

use crate::AppState;
use axum::routing::{post, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for authenticated account endpoints (mounted at /api/auth)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout::logout))
        .route("/password", put(update_password::update_password))
}

#[derive(OpenApi)]
#[openapi(
    paths(logout::logout, update_password::update_password),
    components(schemas(update_password::UpdatePasswordRequest))
)]
pub struct ApiDoc;
