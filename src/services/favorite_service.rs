use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::favorites::{AddFavoriteRequest, FavoriteVenueList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Favorite, Venue},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

pub async fn list_favorites(
    pool: &DbPool,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoriteVenueList>> {
    let (page, limit, offset) = pagination.normalize();
    let venues = sqlx::query_as::<_, Venue>(
        r#"
        SELECT v.*
        FROM favorites f
        JOIN venues v ON v.id = f.venue_id
        WHERE f.user_id = $1
        ORDER BY f.created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user.user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    let data = FavoriteVenueList { items: venues };
    Ok(ApiResponse::success("OK", data, Some(meta)))
}

pub async fn add_favorite(
    pool: &DbPool,
    user: &AuthUser,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<Favorite>> {
    let venue_exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM venues WHERE id = $1 AND is_active = TRUE")
            .bind(payload.venue_id)
            .fetch_optional(pool)
            .await?;

    if venue_exists.is_none() {
        return Err(AppError::Validation("Venue not found".into()));
    }

    // adding twice is a no-op; the (user, venue) pair is unique
    let existing: Option<Favorite> =
        sqlx::query_as("SELECT * FROM favorites WHERE user_id = $1 AND venue_id = $2")
            .bind(user.user_id)
            .bind(payload.venue_id)
            .fetch_optional(pool)
            .await?;

    let favorite = if let Some(fav) = existing {
        fav
    } else {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (id, user_id, venue_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user.user_id)
        .bind(payload.venue_id)
        .fetch_one(pool)
        .await?
    };

    Ok(ApiResponse::success(
        "Added to favorites",
        favorite,
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    pool: &DbPool,
    user: &AuthUser,
    venue_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND venue_id = $2")
        .bind(user.user_id)
        .bind(venue_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
