use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::UserProfile;
use crate::schema::user_profiles;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use dishcovery_core::{next_rank, NextRank};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub email: String,
    pub about: Option<String>,
    pub form_submitted: bool,
    pub successful_cooks: i32,
    pub rank: String,
    /// The next tier to earn, absent once the top tier is reached
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_rank: Option<NextRank>,
}

#[utoipa::path(
    get,
    path = "/api/profile",
    tag = "profile",
    responses(
        (status = 200, description = "The user's profile and rank progress", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_profile(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let profile: Option<UserProfile> = user_profiles::table
        .filter(user_profiles::user_id.eq(user.id))
        .select(UserProfile::as_select())
        .first(&mut conn)
        .optional()
        .unwrap_or(None);

    // Signup creates the profile row; fall back to the defaults if it is
    // somehow missing rather than failing the dashboard.
    let (about, form_submitted, successful_cooks, rank) = match profile {
        Some(p) => (p.about, p.form_submitted, p.successful_cooks, p.rank),
        None => (None, false, 0, "Amateur".to_string()),
    };

    (
        StatusCode::OK,
        Json(ProfileResponse {
            email: user.email,
            about,
            form_submitted,
            successful_cooks,
            rank,
            next_rank: next_rank(successful_cooks),
        }),
    )
        .into_response()
}
