pub mod get;
pub mod update_preferences;

use crate::AppState;
use axum::routing::{get, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/profile endpoints (mounted at /api/profile)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get::get_profile))
        .route(
            "/preferences",
            put(update_preferences::update_preferences),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(get::get_profile, update_preferences::update_preferences),
    components(schemas(
        get::ProfileResponse,
        update_preferences::UpdatePreferencesRequest,
    ))
)]
pub struct ApiDoc;
