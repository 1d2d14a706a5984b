use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Item;
use crate::schema::{items, user_profiles};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use diesel::prelude::*;
use dishcovery_core::ai::{suggest_recipes, AiClient, PantryItem, Recipe};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSuggestionsRequest {
    /// Number of earlier attempts in this session; a positive value asks
    /// the model to diversify from prior suggestions
    #[serde(default)]
    pub retry_count: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSuggestionsResponse {
    pub recipes: Vec<Recipe>,
    /// Set when no suggestions could be produced (empty or fully expired
    /// inventory, or an unparseable model reply)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The composed prompt, returned on success as a debugging aid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Body of the 500 response when the model call itself failed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeSuggestionsError {
    pub error: String,
    pub details: String,
}

#[utoipa::path(
    post,
    path = "/api/recipe-suggestions",
    tag = "ai",
    request_body = RecipeSuggestionsRequest,
    responses(
        (status = 200, description = "Suggested recipes, or an explanatory message when none could be produced", body = RecipeSuggestionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 503, description = "AI service unavailable", body = ErrorResponse),
        (status = 500, description = "Model call failed", body = RecipeSuggestionsError)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn recipe_suggestions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(ai): State<Option<Arc<dyn AiClient>>>,
    Json(request): Json<RecipeSuggestionsRequest>,
) -> impl IntoResponse {
    let Some(ai_client) = ai else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "AI service unavailable".to_string(),
            }),
        )
            .into_response();
    };

    let mut conn = get_conn!(pool);

    let rows: Vec<Item> = match items::table
        .filter(items::user_id.eq(user.id))
        .select(Item::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to load inventory: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to load inventory".to_string(),
                }),
            )
                .into_response();
        }
    };

    let profile_about: Option<String> = user_profiles::table
        .filter(user_profiles::user_id.eq(user.id))
        .select(user_profiles::about)
        .first::<Option<String>>(&mut conn)
        .optional()
        .unwrap_or(None)
        .flatten();
    drop(conn);

    let pantry: Vec<PantryItem> = rows
        .into_iter()
        .map(|item| PantryItem {
            id: item.id,
            name: item.name,
            expiry_date: item.expiry_date,
            about: item.about,
        })
        .collect();

    let today = Utc::now().date_naive();
    let result = match suggest_recipes(
        ai_client.as_ref(),
        &pantry,
        profile_about.as_deref(),
        request.retry_count,
        today,
    )
    .await
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to generate recipe suggestions: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RecipeSuggestionsError {
                    error: "Failed to generate recipe suggestions".to_string(),
                    details: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!(
        recipes = result.recipes.len(),
        cached = result.cached,
        tokens = result.usage.total_tokens,
        "recipe suggestion finished"
    );

    (
        StatusCode::OK,
        Json(RecipeSuggestionsResponse {
            recipes: result.recipes,
            message: result.message,
            prompt: result.prompt,
        }),
    )
        .into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(recipe_suggestions),
    components(schemas(
        RecipeSuggestionsRequest,
        RecipeSuggestionsResponse,
        RecipeSuggestionsError,
    ))
)]
pub struct ApiDoc;
