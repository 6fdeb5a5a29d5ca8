use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Booking status. Transitions are driven exclusively through the table in
/// [`allowed_transitions`]; anything not listed there is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Rejected,
}

impl BookingStatus {
    /// Statuses that occupy a venue's calendar.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            "COMPLETED" => Some(BookingStatus::Completed),
            "REJECTED" => Some(BookingStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        allowed_transitions(*self).is_empty()
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Wedding,
    Conference,
    Birthday,
    Corporate,
    Graduation,
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Wedding => "WEDDING",
            EventType::Conference => "CONFERENCE",
            EventType::Birthday => "BIRTHDAY",
            EventType::Corporate => "CORPORATE",
            EventType::Graduation => "GRADUATION",
            EventType::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WEDDING" => Some(EventType::Wedding),
            "CONFERENCE" => Some(EventType::Conference),
            "BIRTHDAY" => Some(EventType::Birthday),
            "CORPORATE" => Some(EventType::Corporate),
            "GRADUATION" => Some(EventType::Graduation),
            "OTHER" => Some(EventType::Other),
            _ => None,
        }
    }
}

/// Valid next states, encoded as data so transitions can be tested
/// exhaustively.
pub fn allowed_transitions(from: BookingStatus) -> &'static [BookingStatus] {
    match from {
        BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Rejected],
        BookingStatus::Confirmed => &[BookingStatus::Completed, BookingStatus::Cancelled],
        BookingStatus::Cancelled | BookingStatus::Completed | BookingStatus::Rejected => &[],
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("Cannot cancel this booking")]
    NotCancellable,
    #[error("Cannot cancel within 24 hours of start date")]
    CutoffPassed,
}

/// What to write on the booking's rejection_reason column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasonChange {
    Keep,
    Clear,
    Set(String),
}

/// Fully-resolved owner-side transition: the new status plus the timestamp
/// and reason side effects. Pricing fields are never part of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub status: BookingStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub reason: ReasonChange,
}

/// Plan an owner/admin transition. Pure; the caller applies the plan inside
/// its transaction.
pub fn plan_owner_transition(
    current: BookingStatus,
    requested: BookingStatus,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<TransitionPlan, LifecycleError> {
    if !allowed_transitions(current).contains(&requested) {
        return Err(LifecycleError::InvalidTransition {
            from: current,
            to: requested,
        });
    }

    let plan = match requested {
        BookingStatus::Confirmed => TransitionPlan {
            status: requested,
            confirmed_at: Some(now),
            completed_at: None,
            reason: ReasonChange::Clear,
        },
        BookingStatus::Rejected => TransitionPlan {
            status: requested,
            confirmed_at: None,
            completed_at: None,
            reason: ReasonChange::Set(
                reason.unwrap_or_else(|| "Booking rejected by venue owner".to_string()),
            ),
        },
        BookingStatus::Completed => TransitionPlan {
            status: requested,
            confirmed_at: None,
            completed_at: Some(now),
            reason: ReasonChange::Keep,
        },
        BookingStatus::Cancelled => TransitionPlan {
            status: requested,
            confirmed_at: None,
            completed_at: None,
            reason: ReasonChange::Set(
                reason.unwrap_or_else(|| "Cancelled by venue owner".to_string()),
            ),
        },
        BookingStatus::Pending => {
            // unreachable through the table, kept for exhaustiveness
            return Err(LifecycleError::InvalidTransition {
                from: current,
                to: requested,
            });
        }
    };

    Ok(plan)
}

/// Guard for a renter cancelling their own booking. A CONFIRMED booking may
/// not be cancelled within 24 hours of its start date.
pub fn check_self_cancel(
    current: BookingStatus,
    start_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), LifecycleError> {
    if current.is_terminal() {
        return Err(LifecycleError::NotCancellable);
    }
    if current == BookingStatus::Confirmed && (start_date - today).num_days() <= 1 {
        return Err(LifecycleError::CutoffPassed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
        BookingStatus::Rejected,
    ];

    #[test]
    fn only_listed_transitions_are_allowed() {
        for from in ALL {
            for to in ALL {
                let allowed = allowed_transitions(from).contains(&to);
                let expected = matches!(
                    (from, to),
                    (BookingStatus::Pending, BookingStatus::Confirmed)
                        | (BookingStatus::Pending, BookingStatus::Rejected)
                        | (BookingStatus::Confirmed, BookingStatus::Completed)
                        | (BookingStatus::Confirmed, BookingStatus::Cancelled)
                );
                assert_eq!(allowed, expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn rejected_booking_cannot_be_confirmed() {
        let err = plan_owner_transition(
            BookingStatus::Rejected,
            BookingStatus::Confirmed,
            None,
            now(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot change status from REJECTED to CONFIRMED"
        );
    }

    #[test]
    fn confirm_sets_timestamp_and_clears_reason() {
        let plan = plan_owner_transition(
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            Some("ignored".into()),
            now(),
        )
        .unwrap();
        assert_eq!(plan.status, BookingStatus::Confirmed);
        assert_eq!(plan.confirmed_at, Some(now()));
        assert_eq!(plan.completed_at, None);
        assert_eq!(plan.reason, ReasonChange::Clear);
    }

    #[test]
    fn reject_defaults_the_reason() {
        let plan =
            plan_owner_transition(BookingStatus::Pending, BookingStatus::Rejected, None, now())
                .unwrap();
        assert_eq!(
            plan.reason,
            ReasonChange::Set("Booking rejected by venue owner".into())
        );
    }

    #[test]
    fn complete_sets_completed_at_only() {
        let plan = plan_owner_transition(
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            None,
            now(),
        )
        .unwrap();
        assert_eq!(plan.completed_at, Some(now()));
        assert_eq!(plan.confirmed_at, None);
        assert_eq!(plan.reason, ReasonChange::Keep);
    }

    #[test]
    fn self_cancel_blocked_on_terminal_statuses() {
        for status in [
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::Rejected,
        ] {
            assert_eq!(
                check_self_cancel(status, date(2024, 6, 10), date(2024, 6, 1)),
                Err(LifecycleError::NotCancellable)
            );
        }
    }

    #[test]
    fn confirmed_self_cancel_respects_the_24h_cutoff() {
        let today = date(2024, 6, 1);
        // starts tomorrow: inside the cutoff
        assert_eq!(
            check_self_cancel(BookingStatus::Confirmed, date(2024, 6, 2), today),
            Err(LifecycleError::CutoffPassed)
        );
        // starts today: inside the cutoff
        assert_eq!(
            check_self_cancel(BookingStatus::Confirmed, date(2024, 6, 1), today),
            Err(LifecycleError::CutoffPassed)
        );
        // five days out: fine
        assert!(check_self_cancel(BookingStatus::Confirmed, date(2024, 6, 6), today).is_ok());
    }

    #[test]
    fn pending_self_cancel_has_no_cutoff() {
        let today = date(2024, 6, 1);
        assert!(check_self_cancel(BookingStatus::Pending, date(2024, 6, 1), today).is_ok());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in ALL {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("SHIPPED"), None);
    }
}
