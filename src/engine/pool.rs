use std::collections::HashSet;

use crate::engine::direction::TestDirection;
use crate::engine::sign_stats::{SignRecord, SignStatsStore};
use crate::kana::{KanaCategory, Sign};

/// Upper bound on the extra slots one sign can get from its wrong answers.
pub const MAX_EXTRA_WEIGHT: u32 = 1000;

/// Weighted working set questions and distractors are drawn from.
///
/// Each sign appears `1 + wrong` times, with `wrong` capped at
/// `MAX_EXTRA_WEIGHT`, so a uniform draw over the entries favors signs that
/// were missed before. The pool is rebuilt, never patched, whenever the
/// direction or the statistics change.
#[derive(Clone, Debug, Default)]
pub struct TestPool {
    entries: Vec<Sign>,
    direction: Option<TestDirection>,
}

impl TestPool {
    pub fn build(
        store: &SignStatsStore,
        direction: TestDirection,
        categories: &[KanaCategory],
    ) -> Self {
        let mut entries = Vec::new();
        for record in store.records() {
            if !categories.contains(&record.sign.category) {
                continue;
            }
            let extra = relevant_wrong_count(direction, record).min(MAX_EXTRA_WEIGHT);
            let repeat = 1 + extra as usize;
            entries.extend(std::iter::repeat_n(record.sign, repeat));
        }
        tracing::debug!(
            direction = direction.key(),
            entries = entries.len(),
            "test pool rebuilt"
        );
        Self {
            entries,
            direction: Some(direction),
        }
    }

    pub fn entries(&self) -> &[Sign] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn direction(&self) -> Option<TestDirection> {
        self.direction
    }

    /// How many slots `sign` occupies.
    pub fn occurrences(&self, sign: &Sign) -> usize {
        self.entries.iter().filter(|s| *s == sign).count()
    }

    pub fn distinct_roomaji(&self) -> usize {
        self.entries
            .iter()
            .map(|s| s.roomaji)
            .collect::<HashSet<_>>()
            .len()
    }
}

pub fn relevant_wrong_count(direction: TestDirection, record: &SignRecord) -> u32 {
    direction
        .weight_sides()
        .iter()
        .map(|&side| record.wrong_count(side))
        .fold(0u32, u32::saturating_add)
}
