use axum::{Json, Router, extract::State};

use crate::{
    dto::{bookings::StatusGroupedBookings, dashboard::VendorDashboard},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::vendor_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", axum::routing::get(dashboard))
        .route("/bookings", axum::routing::get(vendor_bookings))
}

#[utoipa::path(
    get,
    path = "/api/vendor/dashboard",
    responses(
        (status = 200, description = "Earnings and booking rollup", body = ApiResponse<VendorDashboard>),
        (status = 403, description = "Not a vendor"),
    ),
    tag = "Vendor"
)]
pub async fn dashboard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<VendorDashboard>>> {
    let resp = vendor_service::dashboard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/vendor/bookings",
    responses(
        (status = 200, description = "Bookings on the vendor's venues, by status", body = ApiResponse<StatusGroupedBookings>),
        (status = 403, description = "Not a vendor"),
    ),
    tag = "Vendor"
)]
pub async fn vendor_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<StatusGroupedBookings>>> {
    let resp = vendor_service::vendor_bookings(&state, &user).await?;
    Ok(Json(resp))
}
