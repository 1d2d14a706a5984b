use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::{items, user_profiles};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use dishcovery_core::{next_rank, rank_for_cooks, NextRank};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CookConfirmationRequest {
    /// Ids of the inventory items the cooked recipe used, as returned by
    /// the recipe-suggestions endpoint
    pub used_item_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CookConfirmationResponse {
    /// Ids that matched an inventory row and were removed. Ids already
    /// removed by an earlier confirmation are absent, not errors.
    pub removed_item_ids: Vec<Uuid>,
    pub successful_cooks: i32,
    pub rank: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_rank: Option<NextRank>,
}

/// Delete the used inventory rows and advance the cook counter and rank,
/// all in one transaction. An id that no longer matches a row (already
/// deleted, or never this user's) deletes nothing and is skipped, so
/// re-confirming the same recipe cannot double-delete; on error the
/// transaction rolls back with nothing half-applied.
pub fn confirm_cook(
    conn: &mut PgConnection,
    user_id: Uuid,
    used_item_ids: &[Uuid],
) -> Result<(Vec<Uuid>, i32, &'static str), diesel::result::Error> {
    conn.transaction(|conn| {
        let mut removed_item_ids = Vec::new();
        for item_id in used_item_ids {
            let deleted = diesel::delete(
                items::table
                    .filter(items::id.eq(item_id))
                    .filter(items::user_id.eq(user_id)),
            )
            .execute(conn)?;
            if deleted > 0 {
                removed_item_ids.push(*item_id);
            }
        }

        let current_cooks: Option<i32> = user_profiles::table
            .filter(user_profiles::user_id.eq(user_id))
            .select(user_profiles::successful_cooks)
            .first(conn)
            .optional()?;

        let successful_cooks = current_cooks.unwrap_or(0) + 1;
        let rank = rank_for_cooks(successful_cooks);

        // Signup creates the profile row; the insert arm only matters if it
        // is somehow missing.
        diesel::insert_into(user_profiles::table)
            .values((
                user_profiles::user_id.eq(user_id),
                user_profiles::successful_cooks.eq(successful_cooks),
                user_profiles::rank.eq(rank),
            ))
            .on_conflict(user_profiles::user_id)
            .do_update()
            .set((
                user_profiles::successful_cooks.eq(successful_cooks),
                user_profiles::rank.eq(rank),
            ))
            .execute(conn)?;

        Ok((removed_item_ids, successful_cooks, rank))
    })
}

/// Confirm that a suggested recipe was cooked.
#[utoipa::path(
    post,
    path = "/api/cook-confirmation",
    tag = "cook",
    request_body = CookConfirmationRequest,
    responses(
        (status = 200, description = "Inventory updated and rank advanced", body = CookConfirmationResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Confirmation failed, nothing was changed", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn cook_confirmation(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CookConfirmationRequest>,
) -> impl IntoResponse {
    let mut conn = get_conn!(pool);

    match confirm_cook(&mut conn, user.id, &request.used_item_ids) {
        Ok((removed_item_ids, successful_cooks, rank)) => (
            StatusCode::OK,
            Json(CookConfirmationResponse {
                removed_item_ids,
                successful_cooks,
                rank: rank.to_string(),
                next_rank: next_rank(successful_cooks),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Cook confirmation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to confirm cook".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(cook_confirmation),
    components(schemas(CookConfirmationRequest, CookConfirmationResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewItem, NewUser, NewUserProfile};
    use crate::schema::users;
    use chrono::NaiveDate;
    use diesel_migrations::MigrationHarness;

    /// Connect to the test database and bring it up to date. Tests that
    /// need a live database return early when none is configured.
    fn try_connect() -> Option<PgConnection> {
        let url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .ok()?;
        let mut conn = PgConnection::establish(&url).ok()?;
        conn.run_pending_migrations(crate::db::MIGRATIONS).ok()?;
        Some(conn)
    }

    fn insert_user(conn: &mut PgConnection) -> Uuid {
        let email = format!("cook-test-{}@example.com", Uuid::new_v4());
        let user_id: Uuid = diesel::insert_into(users::table)
            .values(&NewUser {
                email: &email,
                password_hash: "x",
            })
            .returning(users::id)
            .get_result(conn)
            .unwrap();
        diesel::insert_into(user_profiles::table)
            .values(&NewUserProfile { user_id })
            .execute(conn)
            .unwrap();
        user_id
    }

    fn insert_item(conn: &mut PgConnection, user_id: Uuid, name: &str) -> Uuid {
        diesel::insert_into(items::table)
            .values(&NewItem {
                user_id,
                name,
                expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
                about: None,
            })
            .returning(items::id)
            .get_result(conn)
            .unwrap()
    }

    fn inventory_names(conn: &mut PgConnection, user_id: Uuid) -> Vec<String> {
        items::table
            .filter(items::user_id.eq(user_id))
            .select(items::name)
            .order(items::name.asc())
            .load(conn)
            .unwrap()
    }

    fn cooks(conn: &mut PgConnection, user_id: Uuid) -> (i32, String) {
        user_profiles::table
            .filter(user_profiles::user_id.eq(user_id))
            .select((user_profiles::successful_cooks, user_profiles::rank))
            .first(conn)
            .unwrap()
    }

    #[test]
    fn cooking_removes_used_rows_and_increments_once() {
        let Some(mut conn) = try_connect() else {
            return;
        };

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let user_id = insert_user(conn);
            let egg = insert_item(conn, user_id, "Egg");
            insert_item(conn, user_id, "Milk");

            let (removed, successful_cooks, rank) = confirm_cook(conn, user_id, &[egg])?;

            assert_eq!(removed, vec![egg]);
            assert_eq!(successful_cooks, 1);
            assert_eq!(rank, "Amateur");
            assert_eq!(inventory_names(conn, user_id), vec!["Milk"]);
            assert_eq!(cooks(conn, user_id), (1, "Amateur".to_string()));
            Ok(())
        });
    }

    #[test]
    fn reconfirming_skips_already_deleted_ids() {
        let Some(mut conn) = try_connect() else {
            return;
        };

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let user_id = insert_user(conn);
            let egg = insert_item(conn, user_id, "Egg");
            let stale = Uuid::new_v4();

            let (removed, successful_cooks, _) = confirm_cook(conn, user_id, &[egg, stale])?;
            assert_eq!(removed, vec![egg]);
            assert_eq!(successful_cooks, 1);

            // The same ids again: nothing left to delete, but the cook
            // still counts.
            let (removed, successful_cooks, _) = confirm_cook(conn, user_id, &[egg, stale])?;
            assert!(removed.is_empty());
            assert_eq!(successful_cooks, 2);
            Ok(())
        });
    }

    #[test]
    fn cooking_cannot_delete_another_users_items() {
        let Some(mut conn) = try_connect() else {
            return;
        };

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let owner = insert_user(conn);
            let intruder = insert_user(conn);
            let owners_egg = insert_item(conn, owner, "Egg");

            let (removed, _, _) = confirm_cook(conn, intruder, &[owners_egg])?;

            assert!(removed.is_empty());
            assert_eq!(inventory_names(conn, owner), vec!["Egg"]);
            Ok(())
        });
    }

    #[test]
    fn fifth_cook_earns_rookie_chef() {
        let Some(mut conn) = try_connect() else {
            return;
        };

        conn.test_transaction::<_, diesel::result::Error, _>(|conn| {
            let user_id = insert_user(conn);
            diesel::update(user_profiles::table.filter(user_profiles::user_id.eq(user_id)))
                .set(user_profiles::successful_cooks.eq(4))
                .execute(conn)?;

            let (_, successful_cooks, rank) = confirm_cook(conn, user_id, &[])?;

            assert_eq!(successful_cooks, 5);
            assert_eq!(rank, "Rookie Chef");
            assert_eq!(cooks(conn, user_id), (5, "Rookie Chef".to_string()));
            Ok(())
        });
    }

    #[test]
    fn response_reports_new_rank_and_milestone() {
        let body = serde_json::to_value(CookConfirmationResponse {
            removed_item_ids: vec![],
            successful_cooks: 5,
            rank: rank_for_cooks(5).to_string(),
            next_rank: next_rank(5),
        })
        .unwrap();
        assert_eq!(body["rank"], "Rookie Chef");
        assert_eq!(body["next_rank"]["name"], "Expert Chef");
        assert_eq!(body["next_rank"]["remaining"], 10);
    }

    #[test]
    fn top_rank_omits_next_milestone() {
        let body = serde_json::to_value(CookConfirmationResponse {
            removed_item_ids: vec![],
            successful_cooks: 16,
            rank: rank_for_cooks(16).to_string(),
            next_rank: next_rank(16),
        })
        .unwrap();
        assert_eq!(body["rank"], "Expert Chef");
        assert!(body.get("next_rank").is_none());
    }
}
