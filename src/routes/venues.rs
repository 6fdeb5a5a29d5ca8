use axum::{
    Json, Router,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    dto::venues::{
        AvailabilityResponse, BlockDateRequest, BlockedDateList, CreateVenueRequest,
        ToggleActiveResponse, UpdateVenueRequest, VenueList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{BlockedDate, Venue},
    response::ApiResponse,
    routes::params::{AvailableVenuesQuery, DateRangeQuery, VenueQuery},
    services::venue_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(list_venues))
        .route("/", axum::routing::post(create_venue))
        .route("/available", axum::routing::get(available_venues))
        .route("/{id}", axum::routing::get(get_venue))
        .route("/{id}", axum::routing::put(update_venue))
        .route("/{id}/toggle-active", axum::routing::post(toggle_active))
        .route(
            "/{id}/check-availability",
            axum::routing::get(check_availability),
        )
        .route("/{id}/blocked-dates", axum::routing::get(list_blocked_dates))
        .route("/{id}/block-date", axum::routing::post(block_date))
        .route(
            "/{id}/blocked-dates/{date}",
            axum::routing::delete(unblock_date),
        )
}

#[utoipa::path(
    get,
    path = "/api/venues",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in name, description, address, city"),
        ("city" = Option<String>, Query, description = "Filter by city"),
        ("min_capacity" = Option<i32>, Query, description = "Minimum capacity"),
        ("sort_by" = Option<String>, Query, description = "created_at, price_per_day or capacity"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "List venues", body = ApiResponse<VenueList>)
    ),
    tag = "Venues"
)]
pub async fn list_venues(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<VenueQuery>,
) -> AppResult<Json<ApiResponse<VenueList>>> {
    let resp = venue_service::list_venues(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/venues/available",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("start_date" = Option<NaiveDate>, Query, description = "Desired start date"),
        ("end_date" = Option<NaiveDate>, Query, description = "Desired end date"),
        ("city" = Option<String>, Query, description = "Filter by city"),
        ("min_capacity" = Option<i32>, Query, description = "Minimum capacity"),
    ),
    responses(
        (status = 200, description = "Venues free for the range", body = ApiResponse<VenueList>)
    ),
    tag = "Venues"
)]
pub async fn available_venues(
    State(state): State<AppState>,
    Query(query): Query<AvailableVenuesQuery>,
) -> AppResult<Json<ApiResponse<VenueList>>> {
    let resp = venue_service::available_venues(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/venues/{id}",
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    responses(
        (status = 200, description = "Get venue", body = ApiResponse<Venue>),
        (status = 404, description = "Venue not found"),
    ),
    tag = "Venues"
)]
pub async fn get_venue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Venue>>> {
    let resp = venue_service::get_venue(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/venues",
    request_body = CreateVenueRequest,
    responses(
        (status = 200, description = "Venue created", body = ApiResponse<Venue>),
        (status = 403, description = "Not a vendor"),
    ),
    tag = "Venues"
)]
pub async fn create_venue(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateVenueRequest>,
) -> AppResult<Json<ApiResponse<Venue>>> {
    let resp = venue_service::create_venue(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/venues/{id}",
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    request_body = UpdateVenueRequest,
    responses(
        (status = 200, description = "Venue updated", body = ApiResponse<Venue>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Venue not found"),
    ),
    tag = "Venues"
)]
pub async fn update_venue(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVenueRequest>,
) -> AppResult<Json<ApiResponse<Venue>>> {
    let resp = venue_service::update_venue(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/venues/{id}/toggle-active",
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    responses(
        (status = 200, description = "Toggled", body = ApiResponse<ToggleActiveResponse>),
        (status = 403, description = "Not the owner"),
    ),
    tag = "Venues"
)]
pub async fn toggle_active(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ToggleActiveResponse>>> {
    let resp = venue_service::toggle_active(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/venues/{id}/check-availability",
    params(
        ("id" = Uuid, Path, description = "Venue ID"),
        ("start_date" = NaiveDate, Query, description = "Range start"),
        ("end_date" = NaiveDate, Query, description = "Range end"),
    ),
    responses(
        (status = 200, description = "Availability and quote", body = ApiResponse<AvailabilityResponse>),
        (status = 404, description = "Venue not found or inactive"),
    ),
    tag = "Venues"
)]
pub async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<ApiResponse<AvailabilityResponse>>> {
    let resp = venue_service::check_availability(&state, id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/venues/{id}/blocked-dates",
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    responses(
        (status = 200, description = "Blocked dates", body = ApiResponse<BlockedDateList>),
        (status = 404, description = "Venue not found"),
    ),
    tag = "Venues"
)]
pub async fn list_blocked_dates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BlockedDateList>>> {
    let resp = venue_service::list_blocked_dates(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/venues/{id}/block-date",
    params(
        ("id" = Uuid, Path, description = "Venue ID")
    ),
    request_body = BlockDateRequest,
    responses(
        (status = 200, description = "Date blocked", body = ApiResponse<BlockedDate>),
        (status = 400, description = "Date is already blocked"),
        (status = 403, description = "Not the owner"),
    ),
    tag = "Venues"
)]
pub async fn block_date(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BlockDateRequest>,
) -> AppResult<Json<ApiResponse<BlockedDate>>> {
    let resp = venue_service::block_date(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/venues/{id}/blocked-dates/{date}",
    params(
        ("id" = Uuid, Path, description = "Venue ID"),
        ("date" = NaiveDate, Path, description = "Blocked date to remove"),
    ),
    responses(
        (status = 200, description = "Date unblocked"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Date was not blocked"),
    ),
    tag = "Venues"
)]
pub async fn unblock_date(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, date)): Path<(Uuid, NaiveDate)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = venue_service::unblock_date(&state, &user, id, date).await?;
    Ok(Json(resp))
}
