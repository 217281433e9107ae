use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::direction::StatSide;
use crate::kana::Sign;

/// Running statistics for one catalog sign.
#[derive(Clone, Debug, PartialEq)]
pub struct SignRecord {
    pub sign: Sign,
    pub correct_hiragana: u32,
    pub wrong_hiragana: u32,
    pub correct_katakana: u32,
    pub wrong_katakana: u32,
    pub correct_time_hiragana: Duration,
    pub wrong_time_hiragana: Duration,
    pub correct_time_katakana: Duration,
    pub wrong_time_katakana: Duration,
}

impl SignRecord {
    pub fn new(sign: Sign) -> Self {
        Self {
            sign,
            correct_hiragana: 0,
            wrong_hiragana: 0,
            correct_katakana: 0,
            wrong_katakana: 0,
            correct_time_hiragana: Duration::ZERO,
            wrong_time_hiragana: Duration::ZERO,
            correct_time_katakana: Duration::ZERO,
            wrong_time_katakana: Duration::ZERO,
        }
    }

    pub fn correct_count(&self, side: StatSide) -> u32 {
        match side {
            StatSide::Hiragana => self.correct_hiragana,
            StatSide::Katakana => self.correct_katakana,
        }
    }

    pub fn wrong_count(&self, side: StatSide) -> u32 {
        match side {
            StatSide::Hiragana => self.wrong_hiragana,
            StatSide::Katakana => self.wrong_katakana,
        }
    }

    /// Books one answer: bumps exactly one counter and its paired time.
    pub fn record(&mut self, side: StatSide, correct: bool, elapsed: Duration) {
        let (count, time) = match (side, correct) {
            (StatSide::Hiragana, true) => (&mut self.correct_hiragana, &mut self.correct_time_hiragana),
            (StatSide::Hiragana, false) => (&mut self.wrong_hiragana, &mut self.wrong_time_hiragana),
            (StatSide::Katakana, true) => (&mut self.correct_katakana, &mut self.correct_time_katakana),
            (StatSide::Katakana, false) => (&mut self.wrong_katakana, &mut self.wrong_time_katakana),
        };
        *count = count.saturating_add(1);
        *time = time.saturating_add(elapsed);
    }

    /// Cumulative correct time over every answer given on that side.
    pub fn average_answer_time(&self, side: StatSide) -> Duration {
        let (correct_time, answers) = match side {
            StatSide::Hiragana => (
                self.correct_time_hiragana,
                u64::from(self.correct_hiragana) + u64::from(self.wrong_hiragana),
            ),
            StatSide::Katakana => (
                self.correct_time_katakana,
                u64::from(self.correct_katakana) + u64::from(self.wrong_katakana),
            ),
        };
        if answers == 0 {
            return Duration::ZERO;
        }
        let nanos = correct_time.as_nanos() / u128::from(answers);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    fn reset(&mut self, scope: ResetScope) {
        let (correct, wrong) = scope.clears();
        for side in scope.sides() {
            match side {
                StatSide::Hiragana => {
                    if correct {
                        self.correct_hiragana = 0;
                        self.correct_time_hiragana = Duration::ZERO;
                    }
                    if wrong {
                        self.wrong_hiragana = 0;
                        self.wrong_time_hiragana = Duration::ZERO;
                    }
                }
                StatSide::Katakana => {
                    if correct {
                        self.correct_katakana = 0;
                        self.correct_time_katakana = Duration::ZERO;
                    }
                    if wrong {
                        self.wrong_katakana = 0;
                        self.wrong_time_katakana = Duration::ZERO;
                    }
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResetScope {
    All,
    OnlyCorrectAll,
    OnlyCorrectHiragana,
    OnlyCorrectKatakana,
    OnlyWrongAll,
    OnlyWrongHiragana,
    OnlyWrongKatakana,
}

impl ResetScope {
    pub const ALL: [ResetScope; 7] = [
        ResetScope::All,
        ResetScope::OnlyCorrectAll,
        ResetScope::OnlyCorrectHiragana,
        ResetScope::OnlyCorrectKatakana,
        ResetScope::OnlyWrongAll,
        ResetScope::OnlyWrongHiragana,
        ResetScope::OnlyWrongKatakana,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ResetScope::All => "all",
            ResetScope::OnlyCorrectAll => "only-correct-all",
            ResetScope::OnlyCorrectHiragana => "only-correct-hiragana",
            ResetScope::OnlyCorrectKatakana => "only-correct-katakana",
            ResetScope::OnlyWrongAll => "only-wrong-all",
            ResetScope::OnlyWrongHiragana => "only-wrong-hiragana",
            ResetScope::OnlyWrongKatakana => "only-wrong-katakana",
        }
    }

    /// (clears correct counters, clears wrong counters)
    fn clears(self) -> (bool, bool) {
        match self {
            ResetScope::All => (true, true),
            ResetScope::OnlyCorrectAll
            | ResetScope::OnlyCorrectHiragana
            | ResetScope::OnlyCorrectKatakana => (true, false),
            ResetScope::OnlyWrongAll
            | ResetScope::OnlyWrongHiragana
            | ResetScope::OnlyWrongKatakana => (false, true),
        }
    }

    fn sides(self) -> &'static [StatSide] {
        match self {
            ResetScope::OnlyCorrectHiragana | ResetScope::OnlyWrongHiragana => {
                &[StatSide::Hiragana]
            }
            ResetScope::OnlyCorrectKatakana | ResetScope::OnlyWrongKatakana => {
                &[StatSide::Katakana]
            }
            ResetScope::All | ResetScope::OnlyCorrectAll | ResetScope::OnlyWrongAll => {
                &[StatSide::Hiragana, StatSide::Katakana]
            }
        }
    }
}

impl FromStr for ResetScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResetScope::ALL
            .into_iter()
            .find(|scope| scope.key() == s)
            .ok_or_else(|| format!("unknown reset scope `{s}`"))
    }
}

/// Totals across every record, for the statistics view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsSummary {
    pub correct_hiragana: u64,
    pub wrong_hiragana: u64,
    pub correct_katakana: u64,
    pub wrong_katakana: u64,
    pub practiced_signs: usize,
}

impl StatsSummary {
    pub fn accuracy(&self, side: StatSide) -> f64 {
        let (correct, wrong) = match side {
            StatSide::Hiragana => (self.correct_hiragana, self.wrong_hiragana),
            StatSide::Katakana => (self.correct_katakana, self.wrong_katakana),
        };
        let total = correct + wrong;
        if total == 0 {
            return 0.0;
        }
        correct as f64 / total as f64 * 100.0
    }
}

/// Owns one [`SignRecord`] per catalog sign. All mutation goes through
/// `&mut self`, so a reader never sees a half-applied update.
#[derive(Clone, Debug, Default)]
pub struct SignStatsStore {
    records: Vec<SignRecord>,
}

impl SignStatsStore {
    pub fn from_signs<'a>(signs: impl IntoIterator<Item = &'a Sign>) -> Self {
        Self {
            records: signs.into_iter().copied().map(SignRecord::new).collect(),
        }
    }

    pub fn records(&self) -> &[SignRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SignRecord> {
        self.records.get(index)
    }

    pub fn record_at_mut(&mut self, index: usize) -> Option<&mut SignRecord> {
        self.records.get_mut(index)
    }

    pub fn index_of(&self, sign: &Sign) -> Option<usize> {
        self.records.iter().position(|r| r.sign == *sign)
    }

    pub fn find_mut(&mut self, sign: &Sign) -> Option<&mut SignRecord> {
        self.records.iter_mut().find(|r| r.sign == *sign)
    }

    pub fn record_answer(
        &mut self,
        sign: &Sign,
        side: StatSide,
        correct: bool,
        elapsed: Duration,
    ) -> bool {
        match self.find_mut(sign) {
            Some(record) => {
                record.record(side, correct, elapsed);
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self, scope: ResetScope) {
        for record in &mut self.records {
            record.reset(scope);
        }
        tracing::info!(scope = scope.key(), "statistics reset");
    }

    pub fn summary(&self) -> StatsSummary {
        let mut summary = StatsSummary::default();
        for r in &self.records {
            let counts = [
                r.correct_hiragana,
                r.wrong_hiragana,
                r.correct_katakana,
                r.wrong_katakana,
            ];
            summary.correct_hiragana += u64::from(r.correct_hiragana);
            summary.wrong_hiragana += u64::from(r.wrong_hiragana);
            summary.correct_katakana += u64::from(r.correct_katakana);
            summary.wrong_katakana += u64::from(r.wrong_katakana);
            if counts.iter().any(|&c| c > 0) {
                summary.practiced_signs += 1;
            }
        }
        summary
    }

    /// Records with the most wrong answers on `side`, worst first. Signs
    /// never answered wrong are left out.
    pub fn hardest(&self, side: StatSide, limit: usize) -> Vec<&SignRecord> {
        let mut missed: Vec<&SignRecord> = self
            .records
            .iter()
            .filter(|r| r.wrong_count(side) > 0)
            .collect();
        missed.sort_by(|a, b| b.wrong_count(side).cmp(&a.wrong_count(side)));
        missed.truncate(limit);
        missed
    }
}
