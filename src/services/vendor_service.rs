use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    dto::{bookings::StatusGroupedBookings, dashboard::VendorDashboard},
    entity::{
        bookings::{Column as BookingCol, Entity as Bookings},
        venues::{Column as VenueCol, Entity as Venues},
    },
    error::AppResult,
    lifecycle::BookingStatus,
    middleware::auth::{AuthUser, Role, ensure_role},
    response::{ApiResponse, Meta},
    services::booking_service::booking_from_entity,
    state::AppState,
};

/// Vendor dashboard rollup. A point-in-time snapshot recomputed on every
/// request; slightly stale reads are acceptable here.
pub async fn dashboard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<VendorDashboard>> {
    ensure_role(user, Role::Vendor)?;

    let venue_ids: Vec<Uuid> = Venues::find()
        .select_only()
        .column(VenueCol::Id)
        .filter(VenueCol::OwnerId.eq(user.user_id))
        .into_tuple()
        .all(&state.orm)
        .await?;
    let total_venues = venue_ids.len() as i64;

    if venue_ids.is_empty() {
        return Ok(ApiResponse::success(
            "Dashboard",
            VendorDashboard {
                total_earnings: Decimal::ZERO,
                this_month_earnings: Decimal::ZERO,
                pending_bookings: 0,
                total_bookings: 0,
                total_venues,
                recent_bookings: Vec::new(),
            },
            Some(Meta::empty()),
        ));
    }

    let scope = Condition::all().add(BookingCol::VenueId.is_in(venue_ids));
    let completed = scope
        .clone()
        .add(BookingCol::Status.eq(BookingStatus::Completed.as_str()));

    // earnings only count completed bookings, and only the vendor's share
    let total_earnings: Decimal = Bookings::find()
        .select_only()
        .column_as(BookingCol::Subtotal.sum(), "total")
        .filter(completed.clone())
        .into_tuple::<Option<Decimal>>()
        .one(&state.orm)
        .await?
        .flatten()
        .unwrap_or(Decimal::ZERO);

    let month_start = state.clock.month_start();
    let this_month_earnings: Decimal = Bookings::find()
        .select_only()
        .column_as(BookingCol::Subtotal.sum(), "total")
        .filter(completed)
        .filter(BookingCol::CreatedAt.gte(month_start))
        .into_tuple::<Option<Decimal>>()
        .one(&state.orm)
        .await?
        .flatten()
        .unwrap_or(Decimal::ZERO);

    let pending_bookings = Bookings::find()
        .filter(
            scope
                .clone()
                .add(BookingCol::Status.eq(BookingStatus::Pending.as_str())),
        )
        .count(&state.orm)
        .await? as i64;

    let total_bookings = Bookings::find()
        .filter(scope.clone())
        .count(&state.orm)
        .await? as i64;

    let recent_bookings = Bookings::find()
        .filter(scope)
        .order_by_desc(BookingCol::CreatedAt)
        .limit(5)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(booking_from_entity)
        .collect();

    let data = VendorDashboard {
        total_earnings,
        this_month_earnings,
        pending_bookings,
        total_bookings,
        total_venues,
        recent_bookings,
    };
    Ok(ApiResponse::success("Dashboard", data, Some(Meta::empty())))
}

/// Every booking on the vendor's venues, bucketed by status.
pub async fn vendor_bookings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<StatusGroupedBookings>> {
    ensure_role(user, Role::Vendor)?;

    let venue_ids: Vec<Uuid> = Venues::find()
        .select_only()
        .column(VenueCol::Id)
        .filter(VenueCol::OwnerId.eq(user.user_id))
        .into_tuple()
        .all(&state.orm)
        .await?;

    if venue_ids.is_empty() {
        return Ok(ApiResponse::success(
            "Bookings",
            StatusGroupedBookings {
                pending: Vec::new(),
                confirmed: Vec::new(),
                completed: Vec::new(),
                cancelled: Vec::new(),
                rejected: Vec::new(),
            },
            Some(Meta::empty()),
        ));
    }

    let scope = Condition::all().add(BookingCol::VenueId.is_in(venue_ids));

    let data = StatusGroupedBookings {
        pending: by_status(state, &scope, BookingStatus::Pending).await?,
        confirmed: by_status(state, &scope, BookingStatus::Confirmed).await?,
        completed: by_status(state, &scope, BookingStatus::Completed).await?,
        cancelled: by_status(state, &scope, BookingStatus::Cancelled).await?,
        rejected: by_status(state, &scope, BookingStatus::Rejected).await?,
    };
    Ok(ApiResponse::success("Bookings", data, Some(Meta::empty())))
}

async fn by_status(
    state: &AppState,
    scope: &Condition,
    status: BookingStatus,
) -> Result<Vec<crate::models::Booking>, sea_orm::DbErr> {
    let items = Bookings::find()
        .filter(scope.clone().add(BookingCol::Status.eq(status.as_str())))
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?;
    Ok(items.into_iter().map(booking_from_entity).collect())
}
