use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Booking;

/// Point-in-time rollup over one vendor's venues; recomputed per request.
#[derive(Debug, Serialize, ToSchema)]
pub struct VendorDashboard {
    pub total_earnings: Decimal,
    pub this_month_earnings: Decimal,
    pub pending_bookings: i64,
    pub total_bookings: i64,
    pub total_venues: i64,
    pub recent_bookings: Vec<Booking>,
}
