use chrono::NaiveDate;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::{
        blocked_dates::{Column as BlockedCol, Entity as BlockedDates},
        bookings::{Column as BookingCol, Entity as Bookings},
    },
    lifecycle::BookingStatus,
};

/// Why a venue is not free for a range. Blocked dates are reported before
/// booking conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conflict {
    Blocked,
    AlreadyBooked,
}

impl Conflict {
    pub fn message(&self) -> &'static str {
        match self {
            Conflict::Blocked => "Venue is not available for selected dates (blocked)",
            Conflict::AlreadyBooked => "Venue is not available for selected dates (already booked)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub conflicts: Vec<Conflict>,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn first_conflict(&self) -> Option<Conflict> {
        self.conflicts.first().copied()
    }
}

/// Answer "is this venue free for [start, end]?" by combining the two
/// independent checks: owner-blocked dates inside the inclusive range, and
/// overlapping PENDING/CONFIRMED bookings. Terminal bookings never block.
/// Date ordering and past-date rules belong to the caller; runs on any
/// connection so booking creation can call it inside its transaction.
pub async fn check<C: ConnectionTrait>(
    conn: &C,
    venue_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Availability, DbErr> {
    let mut conflicts = Vec::new();

    let blocked = BlockedDates::find()
        .filter(BlockedCol::VenueId.eq(venue_id))
        .filter(BlockedCol::Date.gte(start_date))
        .filter(BlockedCol::Date.lte(end_date))
        .count(conn)
        .await?
        > 0;
    if blocked {
        conflicts.push(Conflict::Blocked);
    }

    // standard interval-overlap test on inclusive ranges
    let booked = Bookings::find()
        .filter(BookingCol::VenueId.eq(venue_id))
        .filter(BookingCol::Status.is_in(BookingStatus::ACTIVE.map(|s| s.as_str())))
        .filter(BookingCol::StartDate.lte(end_date))
        .filter(BookingCol::EndDate.gte(start_date))
        .count(conn)
        .await?
        > 0;
    if booked {
        conflicts.push(Conflict::AlreadyBooked);
    }

    Ok(Availability { conflicts })
}
