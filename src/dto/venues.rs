use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{BlockedDate, Venue},
    pricing::Quote,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVenueRequest {
    pub name: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub capacity: i32,
    pub price_per_day: Decimal,
    /// Defaults to 10 when omitted.
    pub commission_percentage: Option<i32>,
    /// Defaults to 30 when omitted.
    pub deposit_percentage: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVenueRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub capacity: Option<i32>,
    pub price_per_day: Option<Decimal>,
    pub commission_percentage: Option<i32>,
    pub deposit_percentage: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VenueList {
    pub items: Vec<Venue>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleActiveResponse {
    pub is_active: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BlockDateRequest {
    pub date: NaiveDate,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlockedDateList {
    pub items: Vec<BlockedDate>,
}

/// Availability verdict plus a non-binding quote for the same range. The
/// quote is absent when the range is below the minimum bookable span.
#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub available: bool,
    pub reasons: Vec<String>,
    pub quote: Option<Quote>,
}
