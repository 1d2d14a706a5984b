use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::user_profiles;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use dishcovery_core::ai::food_image::UNIDENTIFIED_MESSAGE;
use dishcovery_core::ai::{identify_food_image, AiClient, FoodImageOutcome, ImageData};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProcessFoodImageRequest {
    /// The photo as a data URL or a bare base64 string. A missing or
    /// empty value is a 400, not a deserialization failure.
    #[serde(default)]
    pub image: Option<String>,
}

/// Identification result. `item_name` is the food name on success,
/// "NOT_FOOD" on content rejection, or "ERROR" on a failed model call.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessFoodImageResponse {
    pub item_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rejection category: person, landscape, document, object, unclear, or other
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Split a data URL into its media type and base64 payload. Bare base64
/// input passes through with the default media type.
fn parse_image_payload(raw: &str) -> (&str, &str) {
    match raw.split_once(',') {
        Some((prefix, data)) => {
            let media_type = prefix
                .strip_prefix("data:")
                .and_then(|p| p.split(';').next())
                .filter(|m| !m.is_empty())
                .unwrap_or("image/jpeg");
            (media_type, data)
        }
        None => ("image/jpeg", raw),
    }
}

#[utoipa::path(
    post,
    path = "/api/process-food-image",
    tag = "ai",
    request_body = ProcessFoodImageRequest,
    responses(
        (status = 200, description = "Identification result or content rejection", body = ProcessFoodImageResponse),
        (status = 400, description = "No image provided", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 503, description = "AI service unavailable", body = ErrorResponse),
        (status = 500, description = "Model call failed", body = ProcessFoodImageResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn process_food_image(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(ai): State<Option<Arc<dyn AiClient>>>,
    Json(request): Json<ProcessFoodImageRequest>,
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

    let raw_image = request.image.as_deref().unwrap_or_default();
    if raw_image.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No image provided".to_string(),
            }),
        )
            .into_response();
    }

    let (media_type, base64_data) = parse_image_payload(raw_image);
    let image = ImageData::new(media_type, base64_data);

    // The user's preference notes steer identification toward foods they eat
    let mut conn = get_conn!(pool);
    let preferences: Option<String> = user_profiles::table
        .filter(user_profiles::user_id.eq(user.id))
        .select(user_profiles::about)
        .first::<Option<String>>(&mut conn)
        .optional()
        .unwrap_or(None)
        .flatten();
    drop(conn);

    let result = match identify_food_image(ai_client.as_ref(), image, preferences.as_deref()).await
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to process image: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ProcessFoodImageResponse {
                    item_name: "ERROR".to_string(),
                    error: Some("Failed to process image".to_string()),
                    image_type: None,
                    details: Some(e.to_string()),
                }),
            )
                .into_response();
        }
    };

    tracing::debug!(
        cached = result.cached,
        tokens = result.usage.total_tokens,
        "image identification finished"
    );

    let response = match result.outcome {
        FoodImageOutcome::Identified { item_name } => ProcessFoodImageResponse {
            item_name,
            error: None,
            image_type: None,
            details: None,
        },
        FoodImageOutcome::Rejected(kind) => ProcessFoodImageResponse {
            item_name: "NOT_FOOD".to_string(),
            error: Some(kind.message().to_string()),
            image_type: Some(kind.tag().to_string()),
            details: None,
        },
        FoodImageOutcome::Unidentified => ProcessFoodImageResponse {
            item_name: "NOT_FOOD".to_string(),
            error: Some(UNIDENTIFIED_MESSAGE.to_string()),
            image_type: None,
            details: None,
        },
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(process_food_image),
    components(schemas(ProcessFoodImageRequest, ProcessFoodImageResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_image_field_still_deserializes() {
        // Missing and null images must reach the handler's 400 arm rather
        // than being bounced by the extractor.
        let request: ProcessFoodImageRequest = serde_json::from_str("{}").unwrap();
        assert!(request.image.is_none());

        let request: ProcessFoodImageRequest = serde_json::from_str(r#"{"image": null}"#).unwrap();
        assert!(request.image.is_none());

        let request: ProcessFoodImageRequest =
            serde_json::from_str(r#"{"image": "data:image/png;base64,AAAA"}"#).unwrap();
        assert_eq!(request.image.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn data_url_is_split_into_media_type_and_payload() {
        let (media_type, data) = parse_image_payload("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(media_type, "image/png");
        assert_eq!(data, "iVBORw0KGgo=");
    }

    #[test]
    fn bare_base64_passes_through_with_default_media_type() {
        let (media_type, data) = parse_image_payload("/9j/4AAQSkZJRg==");
        assert_eq!(media_type, "image/jpeg");
        assert_eq!(data, "/9j/4AAQSkZJRg==");
    }

    #[test]
    fn malformed_prefix_falls_back_to_jpeg() {
        let (media_type, data) = parse_image_payload("base64,AAAA");
        assert_eq!(media_type, "image/jpeg");
        assert_eq!(data, "AAAA");
    }

    #[test]
    fn rejection_serializes_with_image_type() {
        let body = serde_json::to_value(ProcessFoodImageResponse {
            item_name: "NOT_FOOD".to_string(),
            error: Some("No food items were detected in this image. Please try uploading a different image that clearly shows food.".to_string()),
            image_type: Some("other".to_string()),
            details: None,
        })
        .unwrap();
        assert_eq!(body["itemName"], "NOT_FOOD");
        assert_eq!(body["imageType"], "other");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn success_serializes_only_the_item_name() {
        let body = serde_json::to_value(ProcessFoodImageResponse {
            item_name: "Red Apple".to_string(),
            error: None,
            image_type: None,
            details: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"itemName": "Red Apple"}));
    }
}
