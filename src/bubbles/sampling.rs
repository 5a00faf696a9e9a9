//! Bounded-retry random sampling.
//!
//! Every sampler here draws until it finds a value that is "free" or the
//! attempt budget runs out. When the budget runs out the last draw is kept:
//! a visual collision is acceptable, an empty slot is not.

use std::ops::RangeInclusive;

use rand::Rng;

/// Draw with `draw` until `is_free` accepts the value or `max_attempts` draws
/// have been made. Always draws at least once.
pub fn sample_with_retry<R, T>(
    rng: &mut R,
    mut draw: impl FnMut(&mut R) -> T,
    is_free: impl Fn(&T) -> bool,
    max_attempts: u32,
) -> T
where
    R: Rng + ?Sized,
{
    let mut value = draw(rng);
    let mut attempts = 1;
    while !is_free(&value) && attempts < max_attempts {
        value = draw(rng);
        attempts += 1;
    }
    value
}

/// Pick a pool entry uniformly, re-rolling entries `is_used` reports as taken.
///
/// Returns `None` only for an empty pool.
pub fn sample_unique<'a, R, T>(
    rng: &mut R,
    pool: &'a [T],
    is_used: impl Fn(&T) -> bool,
    max_attempts: u32,
) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return None;
    }

    let picked = sample_with_retry(
        rng,
        |rng| &pool[rng.random_range(0..pool.len())],
        |candidate| !is_used(*candidate),
        max_attempts,
    );
    Some(picked)
}

/// Pick a position in `range` at least `min_gap` away from every `used` position.
pub fn sample_separated<R>(
    rng: &mut R,
    range: RangeInclusive<f32>,
    used: &[f32],
    min_gap: f32,
    max_attempts: u32,
) -> f32
where
    R: Rng + ?Sized,
{
    sample_with_retry(
        rng,
        |rng| rng.random_range(range.clone()),
        |&position| is_separated(position, used, min_gap),
        max_attempts,
    )
}

/// True if `position` is at least `min_gap` away from all of `used`.
pub fn is_separated(position: f32, used: &[f32], min_gap: f32) -> bool {
    used.iter().all(|other| (other - position).abs() >= min_gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use std::cell::Cell;

    #[test]
    fn test_retry_stops_at_first_free_value() {
        let mut rng = StdRng::seed_from_u64(1);
        let draws = Cell::new(0);
        let value = sample_with_retry(
            &mut rng,
            |_| {
                draws.set(draws.get() + 1);
                draws.get()
            },
            |&v| v == 3,
            20,
        );
        assert_eq!(value, 3);
        assert_eq!(draws.get(), 3);
    }

    #[test]
    fn test_retry_keeps_last_draw_when_budget_exhausted() {
        let mut rng = StdRng::seed_from_u64(1);
        let draws = Cell::new(0);
        let value = sample_with_retry(
            &mut rng,
            |_| {
                draws.set(draws.get() + 1);
                draws.get()
            },
            |_| false,
            20,
        );
        assert_eq!(draws.get(), 20);
        assert_eq!(value, 20);
    }

    #[test]
    fn test_retry_draws_once_with_zero_budget() {
        let mut rng = StdRng::seed_from_u64(1);
        let draws = Cell::new(0);
        sample_with_retry(
            &mut rng,
            |_| draws.set(draws.get() + 1),
            |_| false,
            0,
        );
        assert_eq!(draws.get(), 1);
    }

    #[test]
    fn test_unique_avoids_used_entries() {
        let pool = ["a", "b", "c", "d"];
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = sample_unique(&mut rng, &pool, |t| *t == "b" || *t == "d", 20);
            assert!(matches!(picked, Some(&"a") | Some(&"c")), "seed {seed}: {picked:?}");
        }
    }

    #[test]
    fn test_unique_allows_collision_when_pool_exhausted() {
        let pool = ["a", "b"];
        let mut rng = StdRng::seed_from_u64(7);
        let picked = sample_unique(&mut rng, &pool, |_| true, 20);
        assert!(picked.is_some());
    }

    #[test]
    fn test_unique_empty_pool() {
        let pool: [&str; 0] = [];
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample_unique(&mut rng, &pool, |_| false, 20), None);
    }

    #[test]
    fn test_separated_respects_gap() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            // Free region is [20, 30], 40% of the band.
            let position = sample_separated(&mut rng, 5.0..=30.0, &[5.0], 15.0, 20);
            assert!((20.0..=30.0).contains(&position), "seed {seed}: {position}");
        }
    }

    #[test]
    fn test_separated_stays_in_range_when_crowded() {
        let used = [5.0, 12.0, 19.0, 26.0];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let position = sample_separated(&mut rng, 5.0..=30.0, &used, 15.0, 20);
            assert!((5.0..=30.0).contains(&position));
        }
    }

    #[test]
    fn test_is_separated() {
        assert!(is_separated(50.0, &[], 15.0));
        assert!(is_separated(50.0, &[35.0, 65.0], 15.0));
        assert!(!is_separated(50.0, &[36.0], 15.0));
    }
}
