use axum_venue_rental_api::{
    clock::Clock,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        bookings::{CancelBookingRequest, CreateBookingRequest, UpdateStatusRequest},
        favorites::AddFavoriteRequest,
        venues::BlockDateRequest,
    },
    entity::{users::ActiveModel as UserActive, venues::ActiveModel as VenueActive},
    error::AppError,
    middleware::auth::{AuthUser, Role},
    routes::params::{DateRangeQuery, Pagination},
    services::{booking_service, favorite_service, vendor_service, venue_service},
    state::AppState,
};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Full lifecycle: renter books -> overlap is refused -> owner confirms ->
// invalid transition is refused -> completion feeds the vendor dashboard ->
// self-cancel honors the cutoff.
#[tokio::test]
async fn booking_lifecycle_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    // Pinned so date arithmetic in the assertions below never drifts.
    let today = state.clock.today();
    assert_eq!(today, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

    let vendor_id = create_user(&state, "VENDOR", "owner@example.com").await?;
    let renter_id = create_user(&state, "RENTER", "guest@example.com").await?;

    let venue = VenueActive {
        id: Set(Uuid::new_v4()),
        owner_id: Set(vendor_id),
        name: Set("Test Hall".into()),
        description: Set("A hall for testing".into()),
        city: Set("Austin".into()),
        address: Set("1 Test St".into()),
        capacity: Set(100),
        price_per_day: Set(Decimal::new(50000, 2)),
        commission_percentage: Set(10),
        deposit_percentage: Set(30),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let vendor = AuthUser {
        user_id: vendor_id,
        role: Role::Vendor,
    };
    let renter = AuthUser {
        user_id: renter_id,
        role: Role::Renter,
    };

    let start = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
    let end = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();

    // Quote preview before booking: 3 days at 500.00.
    let availability = venue_service::check_availability(
        &state,
        venue.id,
        DateRangeQuery {
            start_date: start,
            end_date: end,
        },
    )
    .await?
    .data
    .unwrap();
    assert!(availability.available);
    let quote = availability.quote.expect("range is quotable");
    assert_eq!(quote.days, 3);
    assert_eq!(quote.subtotal, Decimal::new(150000, 2));
    assert_eq!(quote.total_amount, Decimal::new(165000, 2));

    let booking = booking_service::create_booking(
        &state,
        &renter,
        CreateBookingRequest {
            venue_id: venue.id,
            start_date: start,
            end_date: end,
            guests_count: 80,
            event_type: "WEDDING".into(),
            contact_phone: "+1 512 555 0100".into(),
            special_requests: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(booking.status, "PENDING");
    assert!(booking.reference.starts_with("BOOK-"));
    assert_eq!(booking.subtotal, Decimal::new(150000, 2));
    assert_eq!(booking.commission, Decimal::new(15000, 2));
    assert_eq!(booking.deposit_amount, Decimal::new(45000, 2));

    // Overlapping request for the same venue is refused.
    let overlap = booking_service::create_booking(
        &state,
        &renter,
        CreateBookingRequest {
            venue_id: venue.id,
            start_date: NaiveDate::from_ymd_opt(2025, 7, 11).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 13).unwrap(),
            guests_count: 10,
            event_type: "BIRTHDAY".into(),
            contact_phone: "+1 512 555 0101".into(),
            special_requests: None,
        },
    )
    .await;
    assert!(matches!(overlap, Err(AppError::Validation(_))));

    // A single date strictly inside the booked range still gets a verdict;
    // the span is too short to quote, so the quote is simply absent.
    let inside = venue_service::check_availability(
        &state,
        venue.id,
        DateRangeQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 7, 11).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 11).unwrap(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!inside.available);
    assert!(inside.quote.is_none());

    // The availability endpoint agrees.
    let taken = venue_service::check_availability(
        &state,
        venue.id,
        DateRangeQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 7, 12).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!taken.available);

    // Checking availability changes nothing; asking again gives the same answer.
    let taken_again = venue_service::check_availability(
        &state,
        venue.id,
        DateRangeQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 7, 12).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(taken.available, taken_again.available);
    assert_eq!(taken.reasons, taken_again.reasons);

    // Blocked dates conflict too.
    venue_service::block_date(
        &state,
        &vendor,
        venue.id,
        BlockDateRequest {
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            reason: Some("Maintenance".into()),
        },
    )
    .await?;
    let blocked = venue_service::check_availability(
        &state,
        venue.id,
        DateRangeQuery {
            start_date: NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 2).unwrap(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(!blocked.available);

    // Owner confirms, then completes.
    let confirmed = booking_service::update_status(
        &state,
        &vendor,
        booking.id,
        UpdateStatusRequest {
            status: "CONFIRMED".into(),
            reason: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(confirmed.status, "CONFIRMED");
    assert!(confirmed.confirmed_at.is_some());

    // CONFIRMED -> REJECTED is not in the transition table.
    let bad = booking_service::update_status(
        &state,
        &vendor,
        booking.id,
        UpdateStatusRequest {
            status: "REJECTED".into(),
            reason: None,
        },
    )
    .await;
    assert!(matches!(bad, Err(AppError::Validation(_))));

    let completed = booking_service::update_status(
        &state,
        &vendor,
        booking.id,
        UpdateStatusRequest {
            status: "COMPLETED".into(),
            reason: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(completed.status, "COMPLETED");
    assert!(completed.completed_at.is_some());

    // Dashboard counts the completed subtotal as earnings.
    let dashboard = vendor_service::dashboard(&state, &vendor).await?.data.unwrap();
    assert_eq!(dashboard.total_earnings, Decimal::new(150000, 2));
    assert_eq!(dashboard.total_bookings, 1);
    assert_eq!(dashboard.total_venues, 1);

    // A confirmed booking starting tomorrow is inside the cutoff.
    let tomorrow = today.succ_opt().unwrap();
    let urgent = booking_service::create_booking(
        &state,
        &renter,
        CreateBookingRequest {
            venue_id: venue.id,
            start_date: tomorrow,
            end_date: tomorrow.succ_opt().unwrap(),
            guests_count: 10,
            event_type: "CORPORATE".into(),
            contact_phone: "+1 512 555 0102".into(),
            special_requests: None,
        },
    )
    .await?
    .data
    .unwrap();
    booking_service::update_status(
        &state,
        &vendor,
        urgent.id,
        UpdateStatusRequest {
            status: "CONFIRMED".into(),
            reason: None,
        },
    )
    .await?;
    let too_late = booking_service::cancel_booking(
        &state,
        &renter,
        urgent.id,
        CancelBookingRequest { reason: None },
    )
    .await;
    assert!(matches!(too_late, Err(AppError::Validation(_))));

    // A pending booking far in the future self-cancels fine.
    let later = booking_service::create_booking(
        &state,
        &renter,
        CreateBookingRequest {
            venue_id: venue.id,
            start_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 3).unwrap(),
            guests_count: 10,
            event_type: "OTHER".into(),
            contact_phone: "+1 512 555 0103".into(),
            special_requests: Some("Late checkout".into()),
        },
    )
    .await?
    .data
    .unwrap();
    let cancelled = booking_service::cancel_booking(
        &state,
        &renter,
        later.id,
        CancelBookingRequest {
            reason: Some("Plans changed".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(cancelled.status, "CANCELLED");
    assert_eq!(cancelled.rejection_reason.as_deref(), Some("Plans changed"));

    // Favorites round-trip; adding twice stays a single row.
    favorite_service::add_favorite(
        &state.pool,
        &renter,
        AddFavoriteRequest { venue_id: venue.id },
    )
    .await?;
    favorite_service::add_favorite(
        &state.pool,
        &renter,
        AddFavoriteRequest { venue_id: venue.id },
    )
    .await?;
    let favorites = favorite_service::list_favorites(
        &state.pool,
        &renter,
        Pagination {
            page: None,
            per_page: None,
        },
    )
    .await?;
    assert_eq!(favorites.meta.as_ref().and_then(|m| m.total), Some(1));
    assert_eq!(favorites.data.unwrap().items[0].id, venue.id);
    favorite_service::remove_favorite(&state.pool, &renter, venue.id).await?;

    // Renter grouping reflects all of the above.
    let groups = booking_service::my_bookings(&state, &renter)
        .await?
        .data
        .unwrap();
    assert!(groups.cancelled.iter().any(|b| b.id == later.id));
    assert!(groups.past.iter().any(|b| b.id == booking.id));
    assert!(groups.upcoming.iter().any(|b| b.id == urgent.id));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE notifications, favorites, bookings, blocked_dates, venues, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let clock = Clock::fixed(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
    Ok(AppState { pool, orm, clock })
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.into()),
        password_hash: Set("dummy".into()),
        full_name: Set(format!("Test {role}")),
        phone: Set(None),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}
