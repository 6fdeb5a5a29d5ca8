pub mod auth_service;
pub mod booking_service;
pub mod favorite_service;
pub mod vendor_service;
pub mod venue_service;
