use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Price breakdown for a date range. Computed once at booking creation and
/// frozen on the booking row; also returned for non-binding previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Quote {
    pub days: i64,
    pub subtotal: Decimal,
    pub commission: Decimal,
    pub deposit_amount: Decimal,
    pub total_amount: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("End date must be after start date")]
    InvalidRange,
}

/// Pure pricing calculation. Both endpoints are chargeable, so a stay from
/// the 1st to the 3rd is three days. `start >= end` is rejected; the minimum
/// bookable span is two days.
pub fn quote(
    price_per_day: Decimal,
    commission_percentage: i32,
    deposit_percentage: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Quote, PricingError> {
    if start >= end {
        return Err(PricingError::InvalidRange);
    }

    let days = (end - start).num_days() + 1;
    let subtotal = (price_per_day * Decimal::from(days)).round_dp(2);
    let commission =
        (subtotal * Decimal::from(commission_percentage) / Decimal::ONE_HUNDRED).round_dp(2);
    let deposit_amount =
        (subtotal * Decimal::from(deposit_percentage) / Decimal::ONE_HUNDRED).round_dp(2);
    let total_amount = subtotal + commission;

    Ok(Quote {
        days,
        subtotal,
        commission,
        deposit_amount,
        total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn range_is_inclusive_of_both_endpoints() {
        let q = quote(dec("100.00"), 10, 30, date(2024, 6, 1), date(2024, 6, 3)).unwrap();
        assert_eq!(q.days, 3);
        assert_eq!(q.subtotal, dec("300.00"));
    }

    #[test]
    fn identities_hold_exactly_to_two_decimals() {
        let cases = [
            ("100.00", 10, 30, date(2024, 6, 1), date(2024, 6, 3)),
            ("333.33", 10, 25, date(2024, 6, 1), date(2024, 6, 4)),
            ("79.99", 12, 50, date(2024, 1, 30), date(2024, 2, 2)),
            ("0.00", 15, 30, date(2024, 6, 1), date(2024, 6, 2)),
            ("12345.67", 0, 0, date(2024, 6, 1), date(2024, 6, 30)),
        ];
        for (rate, commission_pct, deposit_pct, start, end) in cases {
            let rate = dec(rate);
            let q = quote(rate, commission_pct, deposit_pct, start, end).unwrap();
            assert_eq!(q.subtotal, (rate * Decimal::from(q.days)).round_dp(2));
            assert_eq!(q.total_amount, q.subtotal + q.commission);
            assert!(q.subtotal.scale() <= 2);
            assert!(q.commission.scale() <= 2);
            assert!(q.deposit_amount.scale() <= 2);
            assert!(q.total_amount.scale() <= 2);
        }
    }

    #[test]
    fn percentages_are_taken_from_the_rounded_subtotal() {
        let q = quote(dec("333.33"), 10, 30, date(2024, 6, 1), date(2024, 6, 3)).unwrap();
        // 3 days -> 999.99; 10% -> 99.999 -> 100.00
        assert_eq!(q.subtotal, dec("999.99"));
        assert_eq!(q.commission, dec("100.00"));
        assert_eq!(q.deposit_amount, dec("300.00"));
        assert_eq!(q.total_amount, dec("1099.99"));
    }

    #[test]
    fn single_day_and_inverted_ranges_are_rejected() {
        let day = date(2024, 6, 1);
        assert_eq!(
            quote(dec("100.00"), 10, 30, day, day),
            Err(PricingError::InvalidRange)
        );
        assert_eq!(
            quote(dec("100.00"), 10, 30, date(2024, 6, 2), day),
            Err(PricingError::InvalidRange)
        );
    }

    #[test]
    fn quoting_is_idempotent() {
        let a = quote(dec("250.50"), 10, 30, date(2024, 7, 1), date(2024, 7, 5)).unwrap();
        let b = quote(dec("250.50"), 10, 30, date(2024, 7, 1), date(2024, 7, 5)).unwrap();
        assert_eq!(a, b);
    }
}
