use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewForumPost;
use crate::schema::forum_posts;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// A post as shown in the feed. Posts are displayed anonymously, so the
/// author's identity is never part of the response.
#[derive(Debug, Clone, Queryable, Serialize, ToSchema)]
pub struct ForumPostView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListPostsResponse {
    pub posts: Vec<ForumPostView>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatePostResponse {
    pub id: Uuid,
}

#[utoipa::path(
    get,
    path = "/api/forum",
    tag = "forum",
    responses(
        (status = 200, description = "All posts, newest first", body = ListPostsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_posts(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let posts: Vec<ForumPostView> = match forum_posts::table
        .order(forum_posts::created_at.desc())
        .select((
            forum_posts::id,
            forum_posts::content,
            forum_posts::created_at,
        ))
        .load(&mut conn)
    {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to fetch forum posts: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch forum posts".to_string(),
                }),
            )
                .into_response();
        }
    };

    (StatusCode::OK, Json(ListPostsResponse { posts })).into_response()
}

#[utoipa::path(
    post,
    path = "/api/forum",
    tag = "forum",
    request_body(content = CreatePostRequest, example = json!({"content": "Any tips for day-old rice?"})),
    responses(
        (status = 201, description = "Post created", body = CreatePostResponse),
        (status = 400, description = "Empty content", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_post(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreatePostRequest>,
) -> impl IntoResponse {
    let content = request.content.trim();
    if content.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Post content cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(pool);

    let new_post = NewForumPost {
        user_id: user.id,
        content,
    };

    match diesel::insert_into(forum_posts::table)
        .values(&new_post)
        .returning(forum_posts::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => (StatusCode::CREATED, Json(CreatePostResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create forum post: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create forum post".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(list_posts, create_post),
    components(schemas(
        ForumPostView,
        ListPostsResponse,
        CreatePostRequest,
        CreatePostResponse,
    ))
)]
pub struct ApiDoc;
