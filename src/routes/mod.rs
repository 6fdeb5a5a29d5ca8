use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod bookings;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod params;
pub mod vendor;
pub mod venues;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/venues", venues::router())
        .nest("/bookings", bookings::router())
        .nest("/vendor", vendor::router())
        .nest("/favorites", favorites::router())
}
