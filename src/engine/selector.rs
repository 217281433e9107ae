use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::pool::TestPool;
use crate::error::{DrillError, DrillResult};
use crate::kana::Sign;

/// Draws before the selector stops rejecting and samples the eligible
/// entries directly.
pub const MAX_QUESTION_DRAWS: usize = 64;

/// Draws the next question uniformly from the pool, never repeating the
/// roomaji of `previous`.
pub fn select_question<R: Rng + ?Sized>(
    pool: &TestPool,
    previous: Option<&Sign>,
    rng: &mut R,
) -> DrillResult<Sign> {
    let entries = pool.entries();
    let Some(&first) = entries.choose(rng) else {
        return Err(DrillError::EmptyPool);
    };
    let Some(previous) = previous else {
        return Ok(first);
    };

    if !entries.iter().any(|s| s.roomaji != previous.roomaji) {
        return Err(DrillError::DegeneratePool {
            distinct: pool.distinct_roomaji(),
            required: 2,
        });
    }

    let mut candidate = first;
    for _ in 0..MAX_QUESTION_DRAWS {
        if candidate.roomaji != previous.roomaji {
            return Ok(candidate);
        }
        candidate = *entries.choose(rng).ok_or(DrillError::EmptyPool)?;
    }

    // Heavily weighted pools can keep hitting the previous sign. Sampling the
    // remaining entries gives the same distribution the retry loop converges to.
    let eligible: Vec<&Sign> = entries
        .iter()
        .filter(|s| s.roomaji != previous.roomaji)
        .collect();
    tracing::debug!(eligible = eligible.len(), "question draw fell back to eligible entries");
    eligible
        .choose(rng)
        .map(|s| **s)
        .ok_or(DrillError::SelectionExhausted {
            attempts: MAX_QUESTION_DRAWS,
        })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::engine::direction::{StatSide, TestDirection};
    use crate::engine::sign_stats::SignStatsStore;
    use crate::kana::{CATALOG, KanaCategory};

    fn pool_of(signs: &[Sign]) -> TestPool {
        let store = SignStatsStore::from_signs(signs.iter());
        TestPool::build(&store, TestDirection::HiraganaToRoomaji, &KanaCategory::ALL)
    }

    #[test]
    fn test_empty_pool_is_an_error() {
        let mut rng = SmallRng::seed_from_u64(0);
        let pool = TestPool::default();
        assert_eq!(select_question(&pool, None, &mut rng), Err(DrillError::EmptyPool));
    }

    #[test]
    fn test_single_sign_pool_rejects_repeat() {
        let mut rng = SmallRng::seed_from_u64(0);
        let pool = pool_of(&CATALOG[..1]);
        let first = select_question(&pool, None, &mut rng).unwrap();
        assert_eq!(
            select_question(&pool, Some(&first), &mut rng),
            Err(DrillError::DegeneratePool {
                distinct: 1,
                required: 2
            })
        );
    }

    #[test]
    fn test_no_immediate_repeat() {
        let mut rng = SmallRng::seed_from_u64(42);
        let pool = pool_of(&CATALOG[..2]);
        let mut previous = select_question(&pool, None, &mut rng).unwrap();
        for _ in 0..200 {
            let next = select_question(&pool, Some(&previous), &mut rng).unwrap();
            assert_ne!(next.roomaji, previous.roomaji);
            previous = next;
        }
    }

    #[test]
    fn test_homophones_count_as_repeats() {
        let mut rng = SmallRng::seed_from_u64(5);
        let ji = CATALOG.iter().copied().filter(|s| s.roomaji == "ji").collect::<Vec<_>>();
        assert_eq!(ji.len(), 2);
        let pool = pool_of(&ji);
        assert!(matches!(
            select_question(&pool, Some(&ji[0]), &mut rng),
            Err(DrillError::DegeneratePool { .. })
        ));
    }

    #[test]
    fn test_heavily_weighted_pool_still_terminates() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut store = SignStatsStore::from_signs(CATALOG[..2].iter());
        for _ in 0..5000 {
            store.record_answer(&CATALOG[0], StatSide::Hiragana, false, Duration::ZERO);
        }
        let pool = TestPool::build(&store, TestDirection::HiraganaToRoomaji, &KanaCategory::ALL);
        for _ in 0..20 {
            let next = select_question(&pool, Some(&CATALOG[0]), &mut rng).unwrap();
            assert_eq!(next, CATALOG[1]);
        }
    }
}
