pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::{get, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/items endpoints (mounted at /api/items)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_items).post(create::create_item))
        .route(
            "/{id}",
            put(update::update_item).delete(delete::delete_item),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_item,
        list::list_items,
        update::update_item,
        delete::delete_item,
    ),
    components(schemas(
        create::CreateItemRequest,
        create::CreateItemResponse,
        list::ListItemsResponse,
        list::ItemSummary,
        list::StatusFilter,
        update::UpdateItemRequest,
    ))
)]
pub struct ApiDoc;
