use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewItem;
use crate::schema::items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use dishcovery_core::parse_expiry_date;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    /// Expiry date in YYYY-MM-DD form
    pub expiry_date: String,
    pub about: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateItemResponse {
    pub id: Uuid,
}

#[utoipa::path(
    post,
    path = "/api/items",
    tag = "items",
    request_body(content = CreateItemRequest, example = json!({"name": "Milk", "expiry_date": "2025-07-01"})),
    responses(
        (status = 201, description = "Item created successfully", body = CreateItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateItemRequest>,
) -> impl IntoResponse {
    let name = request.name.trim();
    let expiry_date = parse_expiry_date(&request.expiry_date);

    let (name, expiry_date) = match (name.is_empty(), expiry_date) {
        (false, Some(date)) => (name, date),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Item name and expiry date are required".to_string(),
                }),
            )
                .into_response()
        }
    };

    let mut conn = get_conn!(pool);

    let new_item = NewItem {
        user_id: user.id,
        name,
        expiry_date,
        about: request.about.as_deref(),
    };

    match diesel::insert_into(items::table)
        .values(&new_item)
        .returning(items::id)
        .get_result::<Uuid>(&mut conn)
    {
        Ok(id) => (StatusCode::CREATED, Json(CreateItemResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to create item: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create item".to_string(),
                }),
            )
                .into_response()
        }
    }
}
