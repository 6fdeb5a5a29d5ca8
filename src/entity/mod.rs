pub mod blocked_dates;
pub mod bookings;
pub mod favorites;
pub mod notifications;
pub mod users;
pub mod venues;

pub use blocked_dates::Entity as BlockedDates;
pub use bookings::Entity as Bookings;
pub use favorites::Entity as Favorites;
pub use notifications::Entity as Notifications;
pub use users::Entity as Users;
pub use venues::Entity as Venues;
