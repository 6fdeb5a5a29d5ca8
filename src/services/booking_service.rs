use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{LockType, Query as SeaQuery};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    availability,
    dto::bookings::{
        BookingList, CancelBookingRequest, CreateBookingRequest, GroupedBookings,
        UpdateStatusRequest,
    },
    entity::{
        bookings::{
            ActiveModel as BookingActive, Column as BookingCol, Entity as Bookings,
            Model as BookingModel,
        },
        venues::{Column as VenueCol, Entity as Venues},
    },
    error::{AppError, AppResult},
    lifecycle::{self, BookingStatus, EventType, ReasonChange},
    middleware::auth::{AuthUser, Role, ensure_role, ensure_venue_manager},
    models::Booking,
    notify::notify_user,
    pricing,
    reference,
    response::{ApiResponse, Meta},
    routes::params::{BookingListQuery, SortOrder},
    state::AppState,
};

/// Validate, price and persist a new booking in PENDING state.
///
/// The whole check-then-insert sequence runs in one transaction holding the
/// venue row `FOR UPDATE`, so two concurrent requests for the same venue are
/// serialized before the availability check. The exclusion constraint on the
/// bookings table catches anything that slips through at commit time.
pub async fn create_booking(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let today = state.clock.today();
    let txn = state.orm.begin().await?;

    let venue = Venues::find_by_id(payload.venue_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let venue = match venue {
        Some(v) if v.is_active => v,
        _ => return Err(AppError::NotFound),
    };

    if payload.end_date <= payload.start_date {
        return Err(AppError::Validation("End date must be after start date".into()));
    }
    if payload.start_date < today {
        return Err(AppError::Validation("Start date cannot be in the past".into()));
    }
    if payload.guests_count < 1 {
        return Err(AppError::Validation("Guest count must be at least 1".into()));
    }
    if payload.guests_count > venue.capacity {
        return Err(AppError::Validation(format!(
            "Guest count exceeds venue capacity ({})",
            venue.capacity
        )));
    }
    let event_type = EventType::parse(&payload.event_type)
        .ok_or_else(|| AppError::Validation("Invalid event type".into()))?;

    let verdict =
        availability::check(&txn, venue.id, payload.start_date, payload.end_date).await?;
    if let Some(conflict) = verdict.first_conflict() {
        return Err(AppError::Validation(conflict.message().into()));
    }

    let quote = pricing::quote(
        venue.price_per_day,
        venue.commission_percentage,
        venue.deposit_percentage,
        payload.start_date,
        payload.end_date,
    )
    .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking_reference = reference::generate(&txn).await?;

    let active = BookingActive {
        id: Set(Uuid::new_v4()),
        reference: Set(booking_reference.clone()),
        venue_id: Set(venue.id),
        renter_id: Set(user.user_id),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        guests_count: Set(payload.guests_count),
        event_type: Set(event_type.as_str().to_string()),
        contact_phone: Set(payload.contact_phone),
        special_requests: Set(payload.special_requests),
        subtotal: Set(quote.subtotal),
        commission: Set(quote.commission),
        deposit_amount: Set(quote.deposit_amount),
        total_amount: Set(quote.total_amount),
        status: Set(BookingStatus::Pending.as_str().to_string()),
        rejection_reason: Set(None),
        deposit_paid: Set(false),
        full_payment_paid: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
        confirmed_at: Set(None),
        completed_at: Set(None),
    };

    let booking = match active.insert(&txn).await {
        Ok(b) => b,
        // race loser against the overlap exclusion constraint
        Err(err) if err.to_string().contains("bookings_no_overlap") => {
            return Err(AppError::Conflict(
                "Venue was just booked for these dates".into(),
            ));
        }
        Err(err) => return Err(err.into()),
    };

    txn.commit().await?;

    if let Err(err) = notify_user(
        &state.pool,
        venue.owner_id,
        "booking_created",
        &format!("New booking request {} for {}", booking.reference, venue.name),
        Some(serde_json::json!({ "booking_id": booking.id, "venue_id": venue.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "owner notification failed");
    }

    Ok(ApiResponse::success(
        "Booking created",
        booking_from_entity(booking),
        Some(Meta::empty()),
    ))
}

/// Role-scoped listing: renters see their own bookings, vendors every
/// booking on their venues, admins everything.
pub async fn list_bookings(
    state: &AppState,
    user: &AuthUser,
    query: BookingListQuery,
) -> AppResult<ApiResponse<BookingList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = visible_bookings(user);
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(BookingCol::Status.eq(status.clone()));
    }

    let mut finder = Bookings::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(BookingCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(BookingCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(booking_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Bookings",
        BookingList { items },
        Some(meta),
    ))
}

/// Renter-only grouped view: upcoming / past / pending / cancelled.
pub async fn my_bookings(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<GroupedBookings>> {
    ensure_role(user, Role::Renter)?;
    let today = state.clock.today();
    let mine = Condition::all().add(BookingCol::RenterId.eq(user.user_id));

    let upcoming = Bookings::find()
        .filter(mine.clone())
        .filter(BookingCol::StartDate.gte(today))
        .filter(BookingCol::Status.is_in(BookingStatus::ACTIVE.map(|s| s.as_str())))
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let past = Bookings::find()
        .filter(mine.clone())
        .filter(
            Condition::any()
                .add(BookingCol::EndDate.lt(today))
                .add(BookingCol::Status.eq(BookingStatus::Completed.as_str())),
        )
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let pending = Bookings::find()
        .filter(mine.clone())
        .filter(BookingCol::Status.eq(BookingStatus::Pending.as_str()))
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let cancelled = Bookings::find()
        .filter(mine)
        .filter(BookingCol::Status.eq(BookingStatus::Cancelled.as_str()))
        .order_by_desc(BookingCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let data = GroupedBookings {
        upcoming: upcoming.into_iter().map(booking_from_entity).collect(),
        past: past.into_iter().map(booking_from_entity).collect(),
        pending: pending.into_iter().map(booking_from_entity).collect(),
        cancelled: cancelled.into_iter().map(booking_from_entity).collect(),
    };

    Ok(ApiResponse::success("Bookings", data, Some(Meta::empty())))
}

pub async fn get_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Booking>> {
    let booking = Bookings::find_by_id(id).one(&state.orm).await?;
    let booking = match booking {
        Some(b) => b,
        None => return Err(AppError::NotFound),
    };

    let venue = Venues::find_by_id(booking.venue_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("booking {} references missing venue", booking.id))?;

    if !user.can_view_booking(booking.renter_id, venue.owner_id) {
        return Err(AppError::Forbidden);
    }

    Ok(ApiResponse::success(
        "Booking",
        booking_from_entity(booking),
        Some(Meta::empty()),
    ))
}

/// Owner-side transition (confirm / reject / complete / cancel). The booking
/// row is locked so racing transitions cannot both succeed; pricing fields
/// are never touched.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateStatusRequest,
) -> AppResult<ApiResponse<Booking>> {
    let now = state.clock.now();
    let txn = state.orm.begin().await?;

    let booking = Bookings::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let booking = match booking {
        Some(b) => b,
        None => return Err(AppError::NotFound),
    };

    let venue = Venues::find_by_id(booking.venue_id)
        .one(&txn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("booking {} references missing venue", booking.id))?;
    ensure_venue_manager(user, venue.owner_id)?;

    let current = BookingStatus::parse(&booking.status)
        .ok_or_else(|| anyhow::anyhow!("booking {} has unknown status {}", booking.id, booking.status))?;
    let requested = BookingStatus::parse(&payload.status)
        .ok_or_else(|| AppError::Validation("Invalid status".into()))?;

    let plan = lifecycle::plan_owner_transition(current, requested, payload.reason, now)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let renter_id = booking.renter_id;
    let booking_reference = booking.reference.clone();

    let mut active: BookingActive = booking.into();
    active.status = Set(plan.status.as_str().to_string());
    if let Some(at) = plan.confirmed_at {
        active.confirmed_at = Set(Some(at.into()));
    }
    if let Some(at) = plan.completed_at {
        active.completed_at = Set(Some(at.into()));
    }
    match plan.reason {
        ReasonChange::Clear => active.rejection_reason = Set(None),
        ReasonChange::Set(reason) => active.rejection_reason = Set(Some(reason)),
        ReasonChange::Keep => {}
    }
    active.updated_at = Set(now.into());
    let booking = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = notify_user(
        &state.pool,
        renter_id,
        "booking_status",
        &format!(
            "Booking {} is now {}",
            booking_reference,
            plan.status.as_str()
        ),
        Some(serde_json::json!({ "booking_id": booking.id, "status": plan.status.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "renter notification failed");
    }

    Ok(ApiResponse::success(
        "Booking updated",
        booking_from_entity(booking),
        Some(Meta::empty()),
    ))
}

/// Renter self-cancel, guarded by the terminal-status check and the 24-hour
/// cutoff on confirmed bookings.
pub async fn cancel_booking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: CancelBookingRequest,
) -> AppResult<ApiResponse<Booking>> {
    let now = state.clock.now();
    let today = state.clock.today();
    let txn = state.orm.begin().await?;

    let booking = Bookings::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let booking = match booking {
        Some(b) => b,
        None => return Err(AppError::NotFound),
    };

    if booking.renter_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    let current = BookingStatus::parse(&booking.status)
        .ok_or_else(|| anyhow::anyhow!("booking {} has unknown status {}", booking.id, booking.status))?;
    lifecycle::check_self_cancel(current, booking.start_date, today)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let venue = Venues::find_by_id(booking.venue_id)
        .one(&txn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("booking {} references missing venue", booking.id))?;

    let booking_reference = booking.reference.clone();

    let mut active: BookingActive = booking.into();
    active.status = Set(BookingStatus::Cancelled.as_str().to_string());
    active.rejection_reason = Set(Some(
        payload
            .reason
            .unwrap_or_else(|| "Cancelled by renter".to_string()),
    ));
    active.updated_at = Set(now.into());
    let booking = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = notify_user(
        &state.pool,
        venue.owner_id,
        "booking_cancelled",
        &format!("Booking {} was cancelled by the renter", booking_reference),
        Some(serde_json::json!({ "booking_id": booking.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "owner notification failed");
    }

    Ok(ApiResponse::success(
        "Booking cancelled successfully",
        booking_from_entity(booking),
        Some(Meta::empty()),
    ))
}

/// Role strategy for which bookings a user may list.
pub fn visible_bookings(user: &AuthUser) -> Condition {
    match user.role {
        Role::Renter => Condition::all().add(BookingCol::RenterId.eq(user.user_id)),
        Role::Vendor => Condition::all().add(
            BookingCol::VenueId.in_subquery(
                SeaQuery::select()
                    .column(VenueCol::Id)
                    .from(Venues)
                    .and_where(VenueCol::OwnerId.eq(user.user_id))
                    .to_owned(),
            ),
        ),
        Role::Admin => Condition::all(),
    }
}

pub fn booking_from_entity(model: BookingModel) -> Booking {
    Booking {
        id: model.id,
        reference: model.reference,
        venue_id: model.venue_id,
        renter_id: model.renter_id,
        start_date: model.start_date,
        end_date: model.end_date,
        guests_count: model.guests_count,
        event_type: model.event_type,
        contact_phone: model.contact_phone,
        special_requests: model.special_requests,
        subtotal: model.subtotal,
        commission: model.commission,
        deposit_amount: model.deposit_amount,
        total_amount: model.total_amount,
        status: model.status,
        rejection_reason: model.rejection_reason,
        deposit_paid: model.deposit_paid,
        full_payment_paid: model.full_payment_paid,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        confirmed_at: model.confirmed_at.map(|dt| dt.with_timezone(&Utc)),
        completed_at: model.completed_at.map(|dt| dt.with_timezone(&Utc)),
    }
}
