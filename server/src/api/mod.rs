pub mod account;
pub mod cook;
pub mod forum;
pub mod items;
pub mod leaderboard;
pub mod process_food_image;
pub mod profile;
pub mod public;
pub mod recipe_suggestions;
pub mod testing;

use dishcovery_core::ai::{AdditionalIngredient, Recipe};
use dishcovery_core::NextRank;
use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(components(schemas(ErrorResponse, Recipe, AdditionalIngredient, NextRank)))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Add security scheme
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        testing::ApiDoc::openapi(),
        account::ApiDoc::openapi(),
        items::ApiDoc::openapi(),
        profile::ApiDoc::openapi(),
        forum::ApiDoc::openapi(),
        leaderboard::ApiDoc::openapi(),
        process_food_image::ApiDoc::openapi(),
        recipe_suggestions::ApiDoc::openapi(),
        cook::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
