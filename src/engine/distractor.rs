use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::engine::pool::TestPool;
use crate::error::{DrillError, DrillResult};
use crate::kana::Sign;

/// Failed draws for one slot before candidates are limited to one-letter roomaji.
pub const RESTRICT_DOMAIN_AFTER: usize = 20;
/// Failed draws for one slot before the similarity filter stops applying.
pub const RELAX_SIMILARITY_AFTER: usize = 50;
/// Hard cap on draws for a whole answer set.
pub const MAX_DISTRACTOR_DRAWS: usize = 10_000;

/// Number of leading question roomaji letters a similar candidate must share one of.
const SIMILARITY_PREFIX: usize = 3;

/// A candidate is similar when its roomaji contains one of the first three
/// letters of the question's roomaji.
pub fn is_similar(question: &Sign, candidate: &Sign) -> bool {
    question
        .roomaji
        .chars()
        .take(SIMILARITY_PREFIX)
        .any(|c| candidate.roomaji.contains(c))
}

/// Builds `count` possible answers: the question plus distractors with
/// pairwise distinct roomaji, shuffled.
pub fn select_answers<R: Rng + ?Sized>(
    question: &Sign,
    pool: &TestPool,
    count: usize,
    similar_only: bool,
    rng: &mut R,
) -> DrillResult<Vec<Sign>> {
    let entries = pool.entries();
    if entries.is_empty() {
        return Err(DrillError::EmptyPool);
    }
    let count = count.max(1);

    let mut available: HashSet<&str> = entries.iter().map(|s| s.roomaji).collect();
    available.insert(question.roomaji);
    if available.len() < count {
        return Err(DrillError::DegeneratePool {
            distinct: available.len(),
            required: count,
        });
    }

    let short: Vec<Sign> = entries
        .iter()
        .filter(|s| s.roomaji.chars().count() == 1)
        .copied()
        .collect();

    let mut answers = Vec::with_capacity(count);
    answers.push(*question);
    let mut used: HashSet<&str> = HashSet::from([question.roomaji]);

    let mut failed = 0usize;
    let mut draws = 0usize;
    while answers.len() < count {
        if draws >= MAX_DISTRACTOR_DRAWS {
            return Err(DrillError::SelectionExhausted { attempts: draws });
        }
        draws += 1;

        let restrict = failed >= RESTRICT_DOMAIN_AFTER
            && short.iter().any(|s| !used.contains(s.roomaji));
        if restrict && failed == RESTRICT_DOMAIN_AFTER {
            tracing::debug!(
                question = question.roomaji,
                failed,
                "answer slot restricted to one-letter roomaji"
            );
        }
        let domain = if restrict { short.as_slice() } else { entries };
        let Some(candidate) = domain.choose(rng) else {
            failed += 1;
            continue;
        };

        if used.contains(candidate.roomaji) {
            failed += 1;
            continue;
        }
        if similar_only && failed < RELAX_SIMILARITY_AFTER && !is_similar(question, candidate) {
            failed += 1;
            continue;
        }
        if failed >= RELAX_SIMILARITY_AFTER {
            tracing::debug!(
                question = question.roomaji,
                candidate = candidate.roomaji,
                failed,
                "similarity filter relaxed for answer slot"
            );
        }

        used.insert(candidate.roomaji);
        answers.push(*candidate);
        failed = 0;
    }

    answers.shuffle(rng);
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::engine::direction::TestDirection;
    use crate::engine::sign_stats::SignStatsStore;
    use crate::kana::{CATALOG, KanaCategory};

    fn catalog_pool(categories: &[KanaCategory]) -> TestPool {
        let store = SignStatsStore::from_signs(CATALOG.iter());
        TestPool::build(&store, TestDirection::HiraganaToRoomaji, categories)
    }

    fn find(roomaji: &str) -> Sign {
        *CATALOG.iter().find(|s| s.roomaji == roomaji).unwrap()
    }

    #[test]
    fn test_answers_unique_sized_and_contain_question_once() {
        let mut rng = SmallRng::seed_from_u64(11);
        let pool = catalog_pool(&KanaCategory::ALL);
        for question in CATALOG.iter().step_by(7) {
            for similar_only in [false, true] {
                let answers = select_answers(question, &pool, 7, similar_only, &mut rng).unwrap();
                assert_eq!(answers.len(), 7);
                assert_eq!(answers.iter().filter(|s| *s == question).count(), 1);
                let roomaji: HashSet<&str> = answers.iter().map(|s| s.roomaji).collect();
                assert_eq!(roomaji.len(), 7);
            }
        }
    }

    #[test]
    fn test_similar_only_prefers_similar_signs() {
        let mut rng = SmallRng::seed_from_u64(3);
        let pool = catalog_pool(&KanaCategory::ALL);
        let question = find("kya");
        let answers = select_answers(&question, &pool, 7, true, &mut rng).unwrap();
        assert!(answers.iter().all(|s| is_similar(&question, s)));
    }

    #[test]
    fn test_similar_only_terminates_without_similar_candidates() {
        let mut rng = SmallRng::seed_from_u64(8);
        // Only "pe" shares a letter with "e"; the other slots need the relaxed filter.
        let pool = catalog_pool(&[KanaCategory::BaseSemiVoiced]);
        let question = find("e");
        let answers = select_answers(&question, &pool, 4, true, &mut rng).unwrap();
        assert_eq!(answers.len(), 4);
        assert!(answers.contains(&question));
    }

    #[test]
    fn test_repeated_failures_restrict_to_one_letter_signs() {
        let signs: Vec<Sign> = ["ka", "ki", "ku", "ke", "ko", "a", "i", "u", "e", "o"]
            .into_iter()
            .map(find)
            .collect();
        let mut store = SignStatsStore::from_signs(signs.iter());
        let question = find("ka");
        store.find_mut(&question).unwrap().wrong_hiragana = 999;
        let pool = TestPool::build(&store, TestDirection::HiraganaToRoomaji, &KanaCategory::ALL);
        assert_eq!(pool.occurrences(&question), 1000);

        // Nearly every draw hits the question, so most slots are only filled
        // after the domain narrows. Without it about half the picks would be
        // the four two-letter signs.
        let mut picks = 0;
        let mut one_letter = 0;
        for seed in 0..200 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let answers = select_answers(&question, &pool, 3, false, &mut rng).unwrap();
            for answer in answers.iter().filter(|a| **a != question) {
                picks += 1;
                if answer.roomaji.len() == 1 {
                    one_letter += 1;
                }
            }
        }
        assert_eq!(picks, 400);
        assert!(one_letter >= 320, "only {one_letter} of {picks} picks had one letter");
    }

    #[test]
    fn test_degenerate_pool_reported() {
        let mut rng = SmallRng::seed_from_u64(0);
        let pool = catalog_pool(&[KanaCategory::BaseSemiVoiced]);
        let question = find("pa");
        assert_eq!(
            select_answers(&question, &pool, 7, false, &mut rng),
            Err(DrillError::DegeneratePool {
                distinct: 5,
                required: 7
            })
        );
        assert_eq!(
            select_answers(&question, &TestPool::default(), 3, false, &mut rng),
            Err(DrillError::EmptyPool)
        );
    }

    #[test]
    fn test_exact_fit_uses_every_roomaji() {
        let mut rng = SmallRng::seed_from_u64(21);
        let pool = catalog_pool(&[KanaCategory::BaseSemiVoiced]);
        let answers = select_answers(&find("po"), &pool, 5, true, &mut rng).unwrap();
        let mut roomaji: Vec<&str> = answers.iter().map(|s| s.roomaji).collect();
        roomaji.sort();
        assert_eq!(roomaji, vec!["pa", "pe", "pi", "po", "pu"]);
    }

    #[test]
    fn test_is_similar_uses_first_three_letters() {
        assert!(is_similar(&find("shi"), &find("i")));
        assert!(is_similar(&find("chu"), &find("fu")));
        assert!(!is_similar(&find("ka"), &find("no")));
        assert!(!is_similar(&find("n"), &find("ko")));
    }
}
