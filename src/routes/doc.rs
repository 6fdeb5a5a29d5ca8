use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        bookings::{
            BookingList, CancelBookingRequest, CreateBookingRequest, GroupedBookings,
            StatusGroupedBookings, UpdateStatusRequest,
        },
        dashboard::VendorDashboard,
        favorites::{AddFavoriteRequest, FavoriteVenueList},
        venues::{
            AvailabilityResponse, BlockDateRequest, BlockedDateList, CreateVenueRequest,
            ToggleActiveResponse, UpdateVenueRequest, VenueList,
        },
    },
    models::{BlockedDate, Booking, Favorite, User, Venue},
    pricing::Quote,
    response::{ApiResponse, Meta},
    routes::{auth, bookings, favorites, health, params, vendor, venues},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        venues::list_venues,
        venues::available_venues,
        venues::get_venue,
        venues::create_venue,
        venues::update_venue,
        venues::toggle_active,
        venues::check_availability,
        venues::list_blocked_dates,
        venues::block_date,
        venues::unblock_date,
        bookings::create_booking,
        bookings::list_bookings,
        bookings::my_bookings,
        bookings::get_booking,
        bookings::update_status,
        bookings::cancel_booking,
        vendor::dashboard,
        vendor::vendor_bookings,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite
    ),
    components(
        schemas(
            User,
            Venue,
            BlockedDate,
            Booking,
            Favorite,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateVenueRequest,
            UpdateVenueRequest,
            VenueList,
            ToggleActiveResponse,
            BlockDateRequest,
            BlockedDateList,
            AvailabilityResponse,
            Quote,
            CreateBookingRequest,
            UpdateStatusRequest,
            CancelBookingRequest,
            BookingList,
            GroupedBookings,
            StatusGroupedBookings,
            VendorDashboard,
            AddFavoriteRequest,
            FavoriteVenueList,
            params::Pagination,
            params::VenueQuery,
            params::BookingListQuery,
            params::DateRangeQuery,
            params::AvailableVenuesQuery,
            health::HealthData,
            Meta,
            ApiResponse<Venue>,
            ApiResponse<VenueList>,
            ApiResponse<Booking>,
            ApiResponse<BookingList>,
            ApiResponse<VendorDashboard>,
            ApiResponse<FavoriteVenueList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Venues", description = "Venue catalog, blocked dates and availability"),
        (name = "Bookings", description = "Booking lifecycle endpoints"),
        (name = "Vendor", description = "Vendor dashboard endpoints"),
        (name = "Favorites", description = "Favorite venue endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
