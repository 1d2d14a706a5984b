use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::items;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use diesel::prelude::*;
use dishcovery_core::parse_expiry_date;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema, Default)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    /// Expiry date in YYYY-MM-DD form
    pub expiry_date: Option<String>,
    /// Set to empty string to clear the note, or provide a new value
    pub about: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/items/{id}",
    tag = "items",
    params(
        ("id" = Uuid, Path, description = "Item ID")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    // Fetch the existing item
    let existing: Option<(String, NaiveDate, Option<String>)> = items::table
        .filter(items::id.eq(id))
        .filter(items::user_id.eq(user.id))
        .select((items::name, items::expiry_date, items::about))
        .first(&mut conn)
        .optional()
        .unwrap_or(None);

    let Some((current_name, current_expiry, current_about)) = existing else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Item not found".to_string(),
            }),
        )
            .into_response();
    };

    // Calculate new values
    let new_name = match &request.name {
        Some(n) => {
            let trimmed = n.trim();
            if trimmed.is_empty() {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Item name cannot be empty".to_string(),
                    }),
                )
                    .into_response();
            }
            trimmed.to_string()
        }
        None => current_name,
    };
    let new_expiry = match &request.expiry_date {
        Some(raw) => match parse_expiry_date(raw) {
            Some(date) => date,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: "Invalid expiry date".to_string(),
                    }),
                )
                    .into_response();
            }
        },
        None => current_expiry,
    };
    let new_about = match &request.about {
        Some(a) if a.is_empty() => None,
        Some(a) => Some(a.clone()),
        None => current_about,
    };

    // Update the item
    let result = diesel::update(
        items::table
            .filter(items::id.eq(id))
            .filter(items::user_id.eq(user.id)),
    )
    .set((
        items::name.eq(&new_name),
        items::expiry_date.eq(new_expiry),
        items::about.eq(&new_about),
    ))
    .execute(&mut conn);

    match result {
        Ok(0) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Item not found".to_string(),
            }),
        )
            .into_response(),
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!("Failed to update item: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update item".to_string(),
                }),
            )
                .into_response()
        }
    }
}
