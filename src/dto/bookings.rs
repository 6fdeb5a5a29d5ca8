use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Booking;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub venue_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guests_count: i32,
    pub event_type: String,
    pub contact_phone: String,
    pub special_requests: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target status; must be reachable from the current one.
    pub status: String,
    /// Reason recorded on REJECTED/CANCELLED; a default is used if omitted.
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingList {
    pub items: Vec<Booking>,
}

/// Renter view of their bookings, grouped the way the mobile client renders
/// them. A booking may appear in more than one group.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupedBookings {
    pub upcoming: Vec<Booking>,
    pub past: Vec<Booking>,
    pub pending: Vec<Booking>,
    pub cancelled: Vec<Booking>,
}

/// Vendor view: every booking on the vendor's venues, bucketed by status.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusGroupedBookings {
    pub pending: Vec<Booking>,
    pub confirmed: Vec<Booking>,
    pub completed: Vec<Booking>,
    pub cancelled: Vec<Booking>,
    pub rejected: Vec<Booking>,
}
