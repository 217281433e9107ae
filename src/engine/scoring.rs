use std::time::{Duration, Instant};

use crate::engine::direction::{EitherAttribution, RoundSides, StatSide, TestDirection};
use crate::engine::sign_stats::SignStatsStore;
use crate::kana::Sign;

#[derive(Clone, Debug, PartialEq)]
pub struct ScoredAnswer {
    /// `None` when the round ran out of time.
    pub answer: Option<Sign>,
    pub is_correct: bool,
    pub elapsed: Duration,
    pub side: StatSide,
    pub scored_at: Instant,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RoundState {
    AwaitingAnswer,
    Scored(ScoredAnswer),
}

/// One question with its answer candidates. A round is scored at most once;
/// later submissions are ignored.
#[derive(Clone, Debug)]
pub struct Round {
    pub direction: TestDirection,
    pub question: Sign,
    pub sides: RoundSides,
    pub possible_answers: Vec<Sign>,
    pub previous: Option<Sign>,
    pub started_at: Instant,
    state: RoundState,
}

impl Round {
    pub fn new(
        direction: TestDirection,
        question: Sign,
        sides: RoundSides,
        possible_answers: Vec<Sign>,
        previous: Option<Sign>,
        started_at: Instant,
    ) -> Self {
        Self {
            direction,
            question,
            sides,
            possible_answers,
            previous,
            started_at,
            state: RoundState::AwaitingAnswer,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, RoundState::AwaitingAnswer)
    }

    pub fn scored(&self) -> Option<&ScoredAnswer> {
        match &self.state {
            RoundState::Scored(scored) => Some(scored),
            RoundState::AwaitingAnswer => None,
        }
    }

    /// The answer the user picked, once the round is scored.
    pub fn submitted(&self) -> Option<&Sign> {
        self.scored().and_then(|s| s.answer.as_ref())
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    /// Scores `answer` and books it on the question's record. Returns `None`
    /// without touching `store` if the round was already scored.
    pub fn submit(
        &mut self,
        answer: &Sign,
        now: Instant,
        attribution: EitherAttribution,
        store: &mut SignStatsStore,
    ) -> Option<ScoredAnswer> {
        let is_correct = answer.roomaji == self.question.roomaji;
        let elapsed = self.elapsed(now);
        self.finish(Some(*answer), is_correct, elapsed, now, attribution, store)
    }

    /// Scores the round as wrong if `timeout` has passed without an answer.
    pub fn expire(
        &mut self,
        timeout: Duration,
        now: Instant,
        attribution: EitherAttribution,
        store: &mut SignStatsStore,
    ) -> Option<ScoredAnswer> {
        if timeout.is_zero() || self.elapsed(now) < timeout {
            return None;
        }
        self.finish(None, false, timeout, now, attribution, store)
    }

    fn finish(
        &mut self,
        answer: Option<Sign>,
        is_correct: bool,
        elapsed: Duration,
        now: Instant,
        attribution: EitherAttribution,
        store: &mut SignStatsStore,
    ) -> Option<ScoredAnswer> {
        if !self.is_awaiting() {
            tracing::debug!(question = self.question.roomaji, "ignoring answer for scored round");
            return None;
        }

        let side = self.direction.scored_side(self.sides, attribution);
        if !store.record_answer(&self.question, side, is_correct, elapsed) {
            tracing::warn!(question = self.question.roomaji, "question has no statistics record");
        }
        tracing::debug!(
            question = self.question.roomaji,
            correct = is_correct,
            elapsed_ms = elapsed.as_millis() as u64,
            "answer scored"
        );

        let scored = ScoredAnswer {
            answer,
            is_correct,
            elapsed,
            side,
            scored_at: now,
        };
        self.state = RoundState::Scored(scored.clone());
        Some(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kana::{CATALOG, Script};

    fn round(direction: TestDirection, sides: RoundSides, t0: Instant) -> Round {
        Round::new(direction, CATALOG[0], sides, CATALOG[..4].to_vec(), None, t0)
    }

    fn hiragana_to_roomaji() -> RoundSides {
        RoundSides {
            ask: Script::Hiragana,
            answer: Script::Roomaji,
        }
    }

    #[test]
    fn test_correct_answer_books_hiragana_pair() {
        let t0 = Instant::now();
        let mut store = SignStatsStore::from_signs(CATALOG.iter());
        let mut r = round(TestDirection::HiraganaToRoomaji, hiragana_to_roomaji(), t0);

        let scored = r
            .submit(&CATALOG[0], t0 + Duration::from_millis(800), EitherAttribution::Hiragana, &mut store)
            .unwrap();
        assert!(scored.is_correct);
        assert_eq!(scored.elapsed, Duration::from_millis(800));

        let rec = store.get(0).unwrap();
        assert_eq!(rec.correct_hiragana, 1);
        assert_eq!(rec.correct_time_hiragana, Duration::from_millis(800));
        assert_eq!(rec.wrong_hiragana + rec.correct_katakana + rec.wrong_katakana, 0);
    }

    #[test]
    fn test_wrong_answer_is_booked_on_question() {
        let t0 = Instant::now();
        let mut store = SignStatsStore::from_signs(CATALOG.iter());
        let sides = RoundSides {
            ask: Script::Katakana,
            answer: Script::Hiragana,
        };
        let mut r = round(TestDirection::KatakanaToHiragana, sides, t0);
        let scored = r
            .submit(&CATALOG[2], t0 + Duration::from_secs(2), EitherAttribution::Hiragana, &mut store)
            .unwrap();
        assert!(!scored.is_correct);
        assert_eq!(r.submitted(), Some(&CATALOG[2]));
        assert_eq!(store.get(0).unwrap().wrong_katakana, 1);
        assert_eq!(store.get(2).unwrap().wrong_katakana, 0);
    }

    #[test]
    fn test_second_submission_is_ignored() {
        let t0 = Instant::now();
        let mut store = SignStatsStore::from_signs(CATALOG.iter());
        let mut r = round(TestDirection::HiraganaToRoomaji, hiragana_to_roomaji(), t0);
        r.submit(&CATALOG[1], t0, EitherAttribution::Hiragana, &mut store).unwrap();
        let snapshot = store.records().to_vec();

        assert!(r.submit(&CATALOG[0], t0, EitherAttribution::Hiragana, &mut store).is_none());
        assert!(r.expire(Duration::from_millis(1), t0 + Duration::from_secs(9), EitherAttribution::Hiragana, &mut store).is_none());
        assert_eq!(store.records(), snapshot.as_slice());
        assert!(!r.scored().unwrap().is_correct);
    }

    #[test]
    fn test_expire_only_after_timeout() {
        let t0 = Instant::now();
        let mut store = SignStatsStore::from_signs(CATALOG.iter());
        let mut r = round(TestDirection::HiraganaToRoomaji, hiragana_to_roomaji(), t0);
        let timeout = Duration::from_secs(5);

        assert!(r.expire(timeout, t0 + Duration::from_secs(4), EitherAttribution::Hiragana, &mut store).is_none());
        assert!(r.expire(Duration::ZERO, t0 + Duration::from_secs(60), EitherAttribution::Hiragana, &mut store).is_none());
        assert!(r.is_awaiting());

        let scored = r
            .expire(timeout, t0 + Duration::from_secs(6), EitherAttribution::Hiragana, &mut store)
            .unwrap();
        assert!(!scored.is_correct);
        assert_eq!(scored.answer, None);
        assert_eq!(scored.elapsed, timeout);
        assert_eq!(store.get(0).unwrap().wrong_time_hiragana, timeout);
    }

    #[test]
    fn test_roomaji_to_either_attribution_flag() {
        let t0 = Instant::now();
        let sides = RoundSides {
            ask: Script::Roomaji,
            answer: Script::Katakana,
        };
        let mut legacy_store = SignStatsStore::from_signs(CATALOG.iter());
        let mut r = round(TestDirection::RoomajiToHiraganaOrKatakana, sides, t0);
        r.submit(&CATALOG[0], t0, EitherAttribution::Hiragana, &mut legacy_store);
        assert_eq!(legacy_store.get(0).unwrap().correct_hiragana, 1);

        let mut fixed_store = SignStatsStore::from_signs(CATALOG.iter());
        let mut r = round(TestDirection::RoomajiToHiraganaOrKatakana, sides, t0);
        r.submit(&CATALOG[0], t0, EitherAttribution::AnswerScript, &mut fixed_store);
        assert_eq!(fixed_store.get(0).unwrap().correct_katakana, 1);
        assert_eq!(fixed_store.get(0).unwrap().correct_hiragana, 0);
    }
}
