use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{user_profiles, users};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

const LEADERBOARD_SIZE: i64 = 10;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based position in the standings
    pub position: i32,
    pub email: String,
    pub successful_cooks: i32,
    pub rank: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Top chefs by successful cooks", body = LeaderboardResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn leaderboard(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<(String, i32, String)> = match user_profiles::table
        .inner_join(users::table)
        .filter(users::deleted_at.is_null())
        .order(user_profiles::successful_cooks.desc())
        .limit(LEADERBOARD_SIZE)
        .select((
            users::email,
            user_profiles::successful_cooks,
            user_profiles::rank,
        ))
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch leaderboard: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch leaderboard".to_string(),
                }),
            )
                .into_response();
        }
    };

    let entries = rows
        .into_iter()
        .enumerate()
        .map(|(i, (email, successful_cooks, rank))| LeaderboardEntry {
            position: i as i32 + 1,
            email,
            successful_cooks,
            rank,
        })
        .collect();

    (StatusCode::OK, Json(LeaderboardResponse { entries })).into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(leaderboard),
    components(schemas(LeaderboardEntry, LeaderboardResponse))
)]
pub struct ApiDoc;
