pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod favorites;
pub mod venues;
