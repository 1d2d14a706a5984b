use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::user_profiles;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// The onboarding questionnaire. Answers are flattened into the profile's
/// free-text `about` field, which both AI prompts inject as preference
/// context.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePreferencesRequest {
    pub age: String,
    pub gender: String,
    pub pregnancy_status: String,
    pub diet_preferences: String,
    pub specific_diet: String,
    pub fitness_goals: String,
    pub additional_info: Option<String>,
}

fn render_about(form: &UpdatePreferencesRequest) -> String {
    let additional_info = match form.additional_info.as_deref() {
        Some(info) if !info.is_empty() => info,
        _ => "None",
    };
    format!(
        "Age: {}, Gender: {}, Pregnancy Status: {}, Diet Preferences: {}, Specific Diet: {}, Fitness Goals: {}, Additional Info: {}",
        form.age,
        form.gender,
        form.pregnancy_status,
        form.diet_preferences,
        form.specific_diet,
        form.fitness_goals,
        additional_info,
    )
}

#[utoipa::path(
    put,
    path = "/api/profile/preferences",
    tag = "profile",
    request_body = UpdatePreferencesRequest,
    responses(
        (status = 200, description = "Preferences saved"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_preferences(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> impl IntoResponse {
    let about = render_about(&request);

    let mut conn = get_conn!(pool);

    let result = diesel::insert_into(user_profiles::table)
        .values((
            user_profiles::user_id.eq(user.id),
            user_profiles::about.eq(&about),
            user_profiles::form_submitted.eq(true),
        ))
        .on_conflict(user_profiles::user_id)
        .do_update()
        .set((
            user_profiles::about.eq(&about),
            user_profiles::form_submitted.eq(true),
        ))
        .execute(&mut conn);

    match result {
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!("Failed to save preferences: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to save preferences".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> UpdatePreferencesRequest {
        UpdatePreferencesRequest {
            age: "29".to_string(),
            gender: "Female".to_string(),
            pregnancy_status: "Not pregnant".to_string(),
            diet_preferences: "Vegetarian".to_string(),
            specific_diet: "None".to_string(),
            fitness_goals: "Muscle gain".to_string(),
            additional_info: Some("Lactose intolerant".to_string()),
        }
    }

    #[test]
    fn renders_every_answer_in_order() {
        let about = render_about(&form());
        assert_eq!(
            about,
            "Age: 29, Gender: Female, Pregnancy Status: Not pregnant, \
             Diet Preferences: Vegetarian, Specific Diet: None, \
             Fitness Goals: Muscle gain, Additional Info: Lactose intolerant"
        );
    }

    #[test]
    fn missing_additional_info_renders_none() {
        let mut request = form();
        request.additional_info = None;
        assert!(render_about(&request).ends_with("Additional Info: None"));

        request.additional_info = Some(String::new());
        assert!(render_about(&request).ends_with("Additional Info: None"));
    }
}
