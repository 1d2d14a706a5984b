use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::Item;
use crate::schema::items;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use dishcovery_core::{classify, expiry_label, ExpiryStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Expiry bucket filter for the inventory list
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Expired,
    ExpiringSoon,
    Fresh,
}

impl StatusFilter {
    fn matches(self, status: &ExpiryStatus) -> bool {
        match self {
            StatusFilter::Expired => matches!(status, ExpiryStatus::Expired),
            StatusFilter::ExpiringSoon => matches!(status, ExpiryStatus::ExpiringSoon { .. }),
            StatusFilter::Fresh => matches!(status, ExpiryStatus::Fresh),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListItemsParams {
    /// Only return items in this expiry bucket
    pub status: Option<StatusFilter>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemSummary {
    pub id: Uuid,
    pub name: String,
    pub expiry_date: NaiveDate,
    pub about: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Computed expiry bucket: expired, expiring_soon, or fresh
    pub status: String,
    /// Display label: "Expired", "Expires in N days", or the formatted date
    pub status_label: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListItemsResponse {
    pub items: Vec<ItemSummary>,
}

#[utoipa::path(
    get,
    path = "/api/items",
    tag = "items",
    params(ListItemsParams),
    responses(
        (status = 200, description = "The user's inventory, soonest expiry first", body = ListItemsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_items(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListItemsParams>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    let rows: Vec<Item> = match items::table
        .filter(items::user_id.eq(user.id))
        .order(items::expiry_date.asc())
        .select(Item::as_select())
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch items: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch items".to_string(),
                }),
            )
                .into_response();
        }
    };

    let today = Utc::now().date_naive();
    let items = rows
        .into_iter()
        .filter_map(|item| {
            let status = classify(item.expiry_date, today);
            if let Some(filter) = params.status {
                if !filter.matches(&status) {
                    return None;
                }
            }
            Some(ItemSummary {
                id: item.id,
                name: item.name,
                expiry_date: item.expiry_date,
                about: item.about,
                created_at: item.created_at,
                status: status.tag().to_string(),
                status_label: expiry_label(item.expiry_date, today),
            })
        })
        .collect();

    (StatusCode::OK, Json(ListItemsResponse { items })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn filter_matches_each_bucket() {
        let today = day(2025, 6, 1);
        let expired = classify(day(2025, 5, 31), today);
        let expiring = classify(day(2025, 6, 5), today);
        let fresh = classify(day(2025, 7, 1), today);

        assert!(StatusFilter::Expired.matches(&expired));
        assert!(!StatusFilter::Expired.matches(&fresh));
        assert!(StatusFilter::ExpiringSoon.matches(&expiring));
        assert!(!StatusFilter::ExpiringSoon.matches(&expired));
        assert!(StatusFilter::Fresh.matches(&fresh));
        assert!(!StatusFilter::Fresh.matches(&expiring));
    }

    #[test]
    fn filter_deserializes_snake_case() {
        let filter: StatusFilter = serde_json::from_str("\"expiring_soon\"").unwrap();
        assert!(matches!(filter, StatusFilter::ExpiringSoon));
    }
}
