use rand::Rng;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entity::bookings::{Column as BookingCol, Entity as Bookings};

pub const PREFIX: &str = "BOOK-";
const SUFFIX_LEN: usize = 8;
const WIDE_SUFFIX_LEN: usize = 12;
const MAX_ATTEMPTS: usize = 16;

fn candidate(rng: &mut impl Rng, digits: usize) -> String {
    let suffix: String = (0..digits)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("{PREFIX}{suffix}")
}

/// Generate-and-check loop over an arbitrary existence predicate. After
/// `MAX_ATTEMPTS` collisions at 8 digits the suffix widens to 12 digits,
/// which bounds the loop for any realistic table size.
pub fn generate_with<R, F>(rng: &mut R, mut exists: F) -> Option<String>
where
    R: Rng,
    F: FnMut(&str) -> bool,
{
    for _ in 0..MAX_ATTEMPTS {
        let reference = candidate(rng, SUFFIX_LEN);
        if !exists(&reference) {
            return Some(reference);
        }
    }
    for _ in 0..MAX_ATTEMPTS {
        let reference = candidate(rng, WIDE_SUFFIX_LEN);
        if !exists(&reference) {
            return Some(reference);
        }
    }
    None
}

/// Produce a booking reference unused by any existing booking. Runs against
/// the caller's connection so it can share the creation transaction.
pub async fn generate<C: ConnectionTrait>(conn: &C) -> Result<String, DbErr> {
    for attempt in 0..MAX_ATTEMPTS * 2 {
        let digits = if attempt < MAX_ATTEMPTS {
            SUFFIX_LEN
        } else {
            WIDE_SUFFIX_LEN
        };
        // ThreadRng is not Send; keep it out of scope across the await.
        let reference = candidate(&mut rand::thread_rng(), digits);

        let taken = Bookings::find()
            .filter(BookingCol::Reference.eq(reference.as_str()))
            .count(conn)
            .await?
            > 0;
        if !taken {
            return Ok(reference);
        }
    }

    Err(DbErr::Custom(
        "could not allocate a unique booking reference".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn references_have_the_documented_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let reference = generate_with(&mut rng, |_| false).unwrap();
        let suffix = reference.strip_prefix("BOOK-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn ten_thousand_references_are_unique() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen: HashSet<String> = HashSet::new();
        for _ in 0..10_000 {
            let reference = generate_with(&mut rng, |r| seen.contains(r)).unwrap();
            assert!(seen.insert(reference));
        }
        assert_eq!(seen.len(), 10_000);
    }

    #[test]
    fn exhausted_8_digit_space_falls_back_to_wider_suffix() {
        let mut rng = StdRng::seed_from_u64(1);
        let reference = generate_with(&mut rng, |r| r.len() == PREFIX.len() + 8).unwrap();
        assert_eq!(reference.len(), PREFIX.len() + 12);
    }
}
