use chrono::NaiveDate;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    availability,
    dto::venues::{
        AvailabilityResponse, BlockDateRequest, BlockedDateList, CreateVenueRequest,
        ToggleActiveResponse, UpdateVenueRequest, VenueList,
    },
    entity::{
        blocked_dates::{
            ActiveModel as BlockedActive, Column as BlockedCol, Entity as BlockedDates,
            Model as BlockedModel,
        },
        bookings::{Column as BookingCol, Entity as Bookings},
        venues::{ActiveModel as VenueActive, Column as VenueCol, Entity as Venues,
            Model as VenueModel},
    },
    error::{AppError, AppResult},
    lifecycle::BookingStatus,
    middleware::auth::{AuthUser, Role, ensure_venue_manager},
    models::{BlockedDate, Venue},
    pricing,
    response::{ApiResponse, Meta},
    routes::params::{AvailableVenuesQuery, DateRangeQuery, SortOrder, VenueQuery, VenueSortBy},
    state::AppState,
};

/// Role-scoped listing: vendors see their own venues (active or not),
/// renters only active ones, admins everything.
pub async fn list_venues(
    state: &AppState,
    user: &AuthUser,
    query: VenueQuery,
) -> AppResult<ApiResponse<VenueList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = match user.role {
        Role::Vendor => Condition::all().add(VenueCol::OwnerId.eq(user.user_id)),
        Role::Renter => Condition::all().add(VenueCol::IsActive.eq(true)),
        Role::Admin => Condition::all(),
    };

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(VenueCol::Name).ilike(pattern.clone()))
                .add(Expr::col(VenueCol::Description).ilike(pattern.clone()))
                .add(Expr::col(VenueCol::Address).ilike(pattern.clone()))
                .add(Expr::col(VenueCol::City).ilike(pattern)),
        );
    }
    if let Some(city) = query.city.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(VenueCol::City).ilike(city.clone()));
    }
    if let Some(min_capacity) = query.min_capacity {
        condition = condition.add(VenueCol::Capacity.gte(min_capacity));
    }

    let sort_col = match query.sort_by.unwrap_or(VenueSortBy::CreatedAt) {
        VenueSortBy::CreatedAt => VenueCol::CreatedAt,
        VenueSortBy::PricePerDay => VenueCol::PricePerDay,
        VenueSortBy::Capacity => VenueCol::Capacity,
    };

    let mut finder = Venues::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(venue_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Venues",
        VenueList { items },
        Some(meta),
    ))
}

pub async fn get_venue(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Venue>> {
    let venue = Venues::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(venue_from_entity);
    match venue {
        Some(v) => Ok(ApiResponse::success("Venue", v, None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn create_venue(
    state: &AppState,
    user: &AuthUser,
    payload: CreateVenueRequest,
) -> AppResult<ApiResponse<Venue>> {
    if user.role != Role::Vendor && user.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let commission = payload.commission_percentage.unwrap_or(10);
    let deposit = payload.deposit_percentage.unwrap_or(30);
    validate_attributes(payload.capacity, &payload.price_per_day, commission, deposit)?;

    let active = VenueActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(user.user_id),
        name: Set(payload.name),
        description: Set(payload.description),
        city: Set(payload.city),
        address: Set(payload.address),
        capacity: Set(payload.capacity),
        price_per_day: Set(payload.price_per_day.round_dp(2)),
        commission_percentage: Set(commission),
        deposit_percentage: Set(deposit),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let venue = active.insert(&state.orm).await?;

    Ok(ApiResponse::success(
        "Venue created",
        venue_from_entity(venue),
        Some(Meta::empty()),
    ))
}

pub async fn update_venue(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateVenueRequest,
) -> AppResult<ApiResponse<Venue>> {
    let existing = Venues::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(v) => v,
        None => return Err(AppError::NotFound),
    };
    ensure_venue_manager(user, existing.owner_id)?;

    let capacity = payload.capacity.unwrap_or(existing.capacity);
    let price = payload.price_per_day.unwrap_or(existing.price_per_day);
    let commission = payload
        .commission_percentage
        .unwrap_or(existing.commission_percentage);
    let deposit = payload
        .deposit_percentage
        .unwrap_or(existing.deposit_percentage);
    validate_attributes(capacity, &price, commission, deposit)?;

    let now = state.clock.now();
    let mut active: VenueActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    active.capacity = Set(capacity);
    active.price_per_day = Set(price.round_dp(2));
    active.commission_percentage = Set(commission);
    active.deposit_percentage = Set(deposit);
    active.updated_at = Set(now.into());

    let venue = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Venue updated",
        venue_from_entity(venue),
        Some(Meta::empty()),
    ))
}

/// Soft-disable / re-enable. Venues are never hard-deleted; bookings keep
/// referencing them.
pub async fn toggle_active(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ToggleActiveResponse>> {
    let existing = Venues::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(v) => v,
        None => return Err(AppError::NotFound),
    };
    ensure_venue_manager(user, existing.owner_id)?;

    let now_active = !existing.is_active;
    let mut active: VenueActive = existing.into();
    active.is_active = Set(now_active);
    active.updated_at = Set(state.clock.now().into());
    active.update(&state.orm).await?;

    let message = if now_active {
        "Venue activated successfully"
    } else {
        "Venue deactivated successfully"
    };
    Ok(ApiResponse::success(
        message,
        ToggleActiveResponse {
            is_active: now_active,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_blocked_dates(
    state: &AppState,
    venue_id: Uuid,
) -> AppResult<ApiResponse<BlockedDateList>> {
    if Venues::find_by_id(venue_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let items = BlockedDates::find()
        .filter(BlockedCol::VenueId.eq(venue_id))
        .order_by_asc(BlockedCol::Date)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(blocked_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Blocked dates",
        BlockedDateList { items },
        Some(Meta::empty()),
    ))
}

pub async fn block_date(
    state: &AppState,
    user: &AuthUser,
    venue_id: Uuid,
    payload: BlockDateRequest,
) -> AppResult<ApiResponse<BlockedDate>> {
    let venue = Venues::find_by_id(venue_id).one(&state.orm).await?;
    let venue = match venue {
        Some(v) => v,
        None => return Err(AppError::NotFound),
    };
    ensure_venue_manager(user, venue.owner_id)?;

    let duplicate = BlockedDates::find()
        .filter(BlockedCol::VenueId.eq(venue_id))
        .filter(BlockedCol::Date.eq(payload.date))
        .count(&state.orm)
        .await?
        > 0;
    if duplicate {
        return Err(AppError::Validation("Date is already blocked".into()));
    }

    let active = BlockedActive {
        id: Set(Uuid::new_v4()),
        venue_id: Set(venue_id),
        date: Set(payload.date),
        reason: Set(payload.reason),
        created_at: NotSet,
    };
    let blocked = match active.insert(&state.orm).await {
        Ok(b) => b,
        // race loser against the (venue_id, date) unique constraint
        Err(err) if err.to_string().contains("blocked_dates_venue_date_key") => {
            return Err(AppError::Validation("Date is already blocked".into()));
        }
        Err(err) => return Err(err.into()),
    };

    Ok(ApiResponse::success(
        "Date blocked successfully",
        blocked_from_entity(blocked),
        Some(Meta::empty()),
    ))
}

pub async fn unblock_date(
    state: &AppState,
    user: &AuthUser,
    venue_id: Uuid,
    date: NaiveDate,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let venue = Venues::find_by_id(venue_id).one(&state.orm).await?;
    let venue = match venue {
        Some(v) => v,
        None => return Err(AppError::NotFound),
    };
    ensure_venue_manager(user, venue.owner_id)?;

    let result = BlockedDates::delete_many()
        .filter(BlockedCol::VenueId.eq(venue_id))
        .filter(BlockedCol::Date.eq(date))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Date unblocked",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Active venues free for the requested range (when one is given), with the
/// usual city / capacity filters.
pub async fn available_venues(
    state: &AppState,
    query: AvailableVenuesQuery,
) -> AppResult<ApiResponse<VenueList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(VenueCol::IsActive.eq(true));
    if let Some(city) = query.city.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(VenueCol::City).ilike(city.clone()));
    }
    if let Some(min_capacity) = query.min_capacity {
        condition = condition.add(VenueCol::Capacity.gte(min_capacity));
    }

    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if start > end {
            return Err(AppError::Validation("End date must be after start date".into()));
        }

        let blocked_ids: Vec<Uuid> = BlockedDates::find()
            .select_only()
            .column(BlockedCol::VenueId)
            .distinct()
            .filter(BlockedCol::Date.gte(start))
            .filter(BlockedCol::Date.lte(end))
            .into_tuple()
            .all(&state.orm)
            .await?;
        if !blocked_ids.is_empty() {
            condition = condition.add(VenueCol::Id.is_not_in(blocked_ids));
        }

        let booked_ids: Vec<Uuid> = Bookings::find()
            .select_only()
            .column(BookingCol::VenueId)
            .distinct()
            .filter(BookingCol::Status.is_in(BookingStatus::ACTIVE.map(|s| s.as_str())))
            .filter(BookingCol::StartDate.lte(end))
            .filter(BookingCol::EndDate.gte(start))
            .into_tuple()
            .all(&state.orm)
            .await?;
        if !booked_ids.is_empty() {
            condition = condition.add(VenueCol::Id.is_not_in(booked_ids));
        }
    }

    let finder = Venues::find()
        .filter(condition)
        .order_by_desc(VenueCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(venue_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Available venues",
        VenueList { items },
        Some(meta),
    ))
}

/// Non-binding availability + price preview. No persistence, and unlike
/// booking creation no past-date restriction.
pub async fn check_availability(
    state: &AppState,
    venue_id: Uuid,
    query: DateRangeQuery,
) -> AppResult<ApiResponse<AvailabilityResponse>> {
    let venue = Venues::find_by_id(venue_id).one(&state.orm).await?;
    let venue = match venue {
        Some(v) if v.is_active => v,
        _ => return Err(AppError::NotFound),
    };

    if query.start_date > query.end_date {
        return Err(AppError::Validation("End date must be after start date".into()));
    }

    // The verdict comes first: a single-date query is a valid availability
    // question even though it is below the minimum bookable span, so the
    // quote is omitted rather than failing the whole request.
    let verdict =
        availability::check(&state.orm, venue.id, query.start_date, query.end_date).await?;

    let quote = pricing::quote(
        venue.price_per_day,
        venue.commission_percentage,
        venue.deposit_percentage,
        query.start_date,
        query.end_date,
    )
    .ok();

    let data = AvailabilityResponse {
        available: verdict.is_available(),
        reasons: verdict
            .conflicts
            .iter()
            .map(|c| c.message().to_string())
            .collect(),
        quote,
    };
    Ok(ApiResponse::success(
        "Availability",
        data,
        Some(Meta::empty()),
    ))
}

fn validate_attributes(
    capacity: i32,
    price_per_day: &rust_decimal::Decimal,
    commission_percentage: i32,
    deposit_percentage: i32,
) -> Result<(), AppError> {
    if capacity < 1 {
        return Err(AppError::Validation("Capacity must be at least 1".into()));
    }
    if price_per_day.is_sign_negative() {
        return Err(AppError::Validation("Price per day cannot be negative".into()));
    }
    if !(0..=100).contains(&commission_percentage) {
        return Err(AppError::Validation(
            "Commission percentage must be between 0 and 100".into(),
        ));
    }
    if !(0..=100).contains(&deposit_percentage) {
        return Err(AppError::Validation(
            "Deposit percentage must be between 0 and 100".into(),
        ));
    }
    Ok(())
}

pub fn venue_from_entity(model: VenueModel) -> Venue {
    Venue {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        description: model.description,
        city: model.city,
        address: model.address,
        capacity: model.capacity,
        price_per_day: model.price_per_day,
        commission_percentage: model.commission_percentage,
        deposit_percentage: model.deposit_percentage,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}

fn blocked_from_entity(model: BlockedModel) -> BlockedDate {
    BlockedDate {
        id: model.id,
        venue_id: model.venue_id,
        date: model.date,
        reason: model.reason,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn attribute_bounds_are_enforced() {
        let price = Decimal::new(10000, 2);
        assert!(validate_attributes(1, &price, 0, 0).is_ok());
        assert!(validate_attributes(1, &price, 100, 100).is_ok());
        assert!(validate_attributes(0, &price, 10, 30).is_err());
        assert!(validate_attributes(1, &Decimal::new(-1, 2), 10, 30).is_err());
        assert!(validate_attributes(1, &price, 101, 30).is_err());
        assert!(validate_attributes(1, &price, 10, -1).is_err());
    }
}
