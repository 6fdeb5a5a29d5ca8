use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Source of "now" for past-date checks, cancellation cutoffs and month
/// boundaries. Injected through `AppState` so tests can pin the date.
#[derive(Debug, Clone)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn system() -> Self {
        Clock::System
    }

    pub fn fixed(at: DateTime<Utc>) -> Self {
        Clock::Fixed(at)
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// First day of the current month, used by the vendor dashboard.
    pub fn month_start(&self) -> NaiveDate {
        self.today().with_day(1).expect("day 1 always valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_is_deterministic() {
        let at = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let clock = Clock::fixed(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        assert_eq!(
            clock.month_start(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }
}
