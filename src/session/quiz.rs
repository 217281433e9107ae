use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::engine::direction::{EitherAttribution, TestDirection};
use crate::engine::distractor::select_answers;
use crate::engine::hint::{HintQuery, HintShowType};
use crate::engine::pool::TestPool;
use crate::engine::scoring::{Round, ScoredAnswer};
use crate::engine::selector::select_question;
use crate::engine::sign_stats::{ResetScope, SignStatsStore};
use crate::error::{DrillError, DrillResult};
use crate::kana::{KanaCategory, Sign};
use crate::session::events::QuizEvent;

/// The slice of configuration the engine reads.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSettings {
    pub direction: TestDirection,
    pub answer_count: usize,
    pub similar_only: bool,
    pub hint_show_type: HintShowType,
    pub answer_timeout: Option<Duration>,
    pub error_highlight: Duration,
    pub attribution: EitherAttribution,
    pub categories: Vec<KanaCategory>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            direction: config.test_direction,
            answer_count: config.answer_count(),
            similar_only: config.similar_answers_only,
            hint_show_type: config.hint_show_type,
            answer_timeout: config.answer_timeout(),
            error_highlight: config.error_highlight(),
            attribution: config.roomaji_either_attribution,
            categories: config.enabled_categories.clone(),
        }
    }
}

/// Drives rounds over one statistics store: builds the pool, draws questions
/// and answers, scores submissions and resolves hints.
///
/// The session never sleeps. After a wrong answer it reports when the next
/// round may start and the caller decides when to ask for it.
pub struct QuizSession<R: Rng = SmallRng> {
    settings: SessionSettings,
    stats: SignStatsStore,
    pool: TestPool,
    round: Option<Round>,
    last_question: Option<Sign>,
    marked: Vec<bool>,
    ready_at: Option<Instant>,
    rng: R,
}

impl QuizSession<SmallRng> {
    pub fn seeded(stats: SignStatsStore, settings: SessionSettings, seed: u64) -> Self {
        Self::new(stats, settings, SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy(stats: SignStatsStore, settings: SessionSettings) -> Self {
        Self::new(stats, settings, SmallRng::from_entropy())
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn new(stats: SignStatsStore, settings: SessionSettings, rng: R) -> Self {
        let pool = TestPool::build(&stats, settings.direction, &settings.categories);
        Self {
            settings,
            stats,
            pool,
            round: None,
            last_question: None,
            marked: Vec::new(),
            ready_at: None,
            rng,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn stats(&self) -> &SignStatsStore {
        &self.stats
    }

    pub fn pool(&self) -> &TestPool {
        &self.pool
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn into_stats(self) -> SignStatsStore {
        self.stats
    }

    /// Swaps the settings in, rebuilding the pool and dropping the current
    /// round when anything it depends on changed.
    pub fn apply_settings(&mut self, settings: SessionSettings) {
        let structural = settings.direction != self.settings.direction
            || settings.categories != self.settings.categories;
        let answers_changed = settings.answer_count != self.settings.answer_count
            || settings.similar_only != self.settings.similar_only;
        self.settings = settings;
        if structural {
            self.rebuild_pool();
        }
        if structural || answers_changed {
            self.discard_round();
        }
    }

    pub fn set_direction(&mut self, direction: TestDirection) {
        let settings = SessionSettings {
            direction,
            ..self.settings.clone()
        };
        self.apply_settings(settings);
    }

    pub fn set_hint_show_type(&mut self, show: HintShowType) {
        self.settings.hint_show_type = show;
    }

    pub fn rebuild_pool(&mut self) {
        self.pool = TestPool::build(&self.stats, self.settings.direction, &self.settings.categories);
    }

    fn discard_round(&mut self) {
        if let Some(round) = self.round.take() {
            self.last_question = Some(round.question);
        }
        self.marked.clear();
        self.ready_at = None;
    }

    /// Draws a new question and its answers.
    pub fn next_round(&mut self, now: Instant) -> DrillResult<QuizEvent> {
        let previous = self
            .round
            .as_ref()
            .map(|r| r.question)
            .or(self.last_question);
        let question = select_question(&self.pool, previous.as_ref(), &mut self.rng)?;
        self.start_round(question, previous, now)
    }

    /// Asks the previous question again with freshly drawn answers. The
    /// replayed round has no previous question of its own, so going back
    /// works once per question.
    pub fn replay_previous(&mut self, now: Instant) -> DrillResult<QuizEvent> {
        let current = self.round.as_ref().ok_or(DrillError::NoActiveRound)?;
        let previous = current.previous.ok_or(DrillError::NoPreviousRound)?;
        self.start_round(previous, None, now)
    }

    fn start_round(
        &mut self,
        question: Sign,
        previous: Option<Sign>,
        now: Instant,
    ) -> DrillResult<QuizEvent> {
        let sides = self.settings.direction.resolve_sides(&mut self.rng);
        let possible_answers = select_answers(
            &question,
            &self.pool,
            self.settings.answer_count,
            self.settings.similar_only,
            &mut self.rng,
        )?;
        tracing::debug!(
            question = question.roomaji,
            ask = ?sides.ask,
            answers = possible_answers.len(),
            "round started"
        );

        self.marked = vec![false; possible_answers.len()];
        self.ready_at = None;
        self.last_question = previous;
        let event = QuizEvent::QuestionReady {
            question,
            ask: sides.ask,
            answer_script: sides.answer,
            possible_answers: possible_answers.clone(),
        };
        self.round = Some(Round::new(
            self.settings.direction,
            question,
            sides,
            possible_answers,
            previous,
            now,
        ));
        Ok(event)
    }

    /// Scores the answer in `slot`. Returns `None` when there is no round
    /// waiting for an answer or the slot does not exist.
    pub fn submit_slot(&mut self, slot: usize, now: Instant) -> Option<QuizEvent> {
        let answer = *self.round.as_ref()?.possible_answers.get(slot)?;
        self.submit(&answer, now)
    }

    pub fn submit(&mut self, answer: &Sign, now: Instant) -> Option<QuizEvent> {
        let attribution = self.settings.attribution;
        let scored = self
            .round
            .as_mut()?
            .submit(answer, now, attribution, &mut self.stats)?;
        Some(self.after_scoring(scored, now))
    }

    /// Scores the round as wrong once the configured answer timeout passed.
    pub fn expire(&mut self, now: Instant) -> Option<QuizEvent> {
        let timeout = self.settings.answer_timeout?;
        let attribution = self.settings.attribution;
        let scored = self
            .round
            .as_mut()?
            .expire(timeout, now, attribution, &mut self.stats)?;
        Some(self.after_scoring(scored, now))
    }

    fn after_scoring(&mut self, scored: ScoredAnswer, now: Instant) -> QuizEvent {
        let delay = if scored.is_correct {
            Duration::ZERO
        } else {
            self.settings.error_highlight
        };
        self.ready_at = Some(now + delay);
        self.rebuild_pool();
        QuizEvent::AnswerScored {
            is_correct: scored.is_correct,
            elapsed: scored.elapsed,
        }
    }

    /// True once the current round is scored and its highlight delay passed.
    pub fn is_ready(&self, now: Instant) -> bool {
        self.ready_at.is_some_and(|at| now >= at)
    }

    pub fn ready_at(&self) -> Option<Instant> {
        self.ready_at
    }

    /// Fraction of the answer timeout already used, for a countdown display.
    pub fn timeout_progress(&self, now: Instant) -> Option<f64> {
        let timeout = self.settings.answer_timeout?;
        let round = self.round.as_ref().filter(|r| r.is_awaiting())?;
        Some((round.elapsed(now).as_secs_f64() / timeout.as_secs_f64()).min(1.0))
    }

    pub fn toggle_mark(&mut self, slot: usize) {
        if let Some(mark) = self.marked.get_mut(slot) {
            *mark = !*mark;
        }
    }

    pub fn marked(&self) -> &[bool] {
        &self.marked
    }

    pub fn hints(&self) -> QuizEvent {
        let hints = match &self.round {
            Some(round) => HintQuery::for_round(self.settings.hint_show_type, round, &self.marked)
                .resolve_all(&round.possible_answers),
            None => Vec::new(),
        };
        QuizEvent::HintColorsUpdated(hints)
    }

    pub fn reset(&mut self, scope: ResetScope) {
        self.stats.reset(scope);
        self.rebuild_pool();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hint::Hint;
    use crate::kana::{CATALOG, Script};

    fn session() -> QuizSession {
        QuizSession::seeded(
            SignStatsStore::from_signs(CATALOG.iter()),
            SessionSettings::default(),
            17,
        )
    }

    fn question_of(event: &QuizEvent) -> Sign {
        match event {
            QuizEvent::QuestionReady { question, .. } => *question,
            other => panic!("expected QuestionReady, got {other:?}"),
        }
    }

    #[test]
    fn test_question_ready_carries_answers() {
        let mut s = session();
        let event = s.next_round(Instant::now()).unwrap();
        let QuizEvent::QuestionReady {
            question,
            ask,
            answer_script,
            possible_answers,
        } = event
        else {
            panic!("expected QuestionReady");
        };
        assert_eq!(ask, Script::Hiragana);
        assert_eq!(answer_script, Script::Roomaji);
        assert_eq!(possible_answers.len(), 7);
        assert!(possible_answers.contains(&question));
        assert_eq!(s.marked().len(), 7);
    }

    #[test]
    fn test_wrong_answer_weights_pool_and_delays() {
        let mut s = session();
        let t0 = Instant::now();
        let question = question_of(&s.next_round(t0).unwrap());
        let round = s.round().unwrap();
        let wrong = round
            .possible_answers
            .iter()
            .position(|a| a.roomaji != question.roomaji)
            .unwrap();

        let before = s.pool().len();
        let event = s.submit_slot(wrong, t0 + Duration::from_millis(900)).unwrap();
        assert_eq!(
            event,
            QuizEvent::AnswerScored {
                is_correct: false,
                elapsed: Duration::from_millis(900)
            }
        );
        assert_eq!(s.pool().len(), before + 1);
        assert_eq!(s.pool().occurrences(&question), 2);

        let scored_at = t0 + Duration::from_millis(900);
        assert!(!s.is_ready(scored_at + Duration::from_millis(1499)));
        assert!(s.is_ready(scored_at + Duration::from_millis(1500)));
    }

    #[test]
    fn test_correct_answer_ready_immediately() {
        let mut s = session();
        let t0 = Instant::now();
        let question = question_of(&s.next_round(t0).unwrap());
        let event = s.submit(&question, t0).unwrap();
        assert!(matches!(event, QuizEvent::AnswerScored { is_correct: true, .. }));
        assert!(s.is_ready(t0));
    }

    #[test]
    fn test_double_submission_is_a_no_op() {
        let mut s = session();
        let t0 = Instant::now();
        s.next_round(t0).unwrap();
        s.submit_slot(0, t0).unwrap();
        let snapshot = s.stats().records().to_vec();
        assert!(s.submit_slot(1, t0).is_none());
        assert!(s.submit_slot(0, t0).is_none());
        assert_eq!(s.stats().records(), snapshot.as_slice());
    }

    #[test]
    fn test_submit_without_round_is_ignored() {
        let mut s = session();
        assert!(s.submit_slot(0, Instant::now()).is_none());
        assert_eq!(s.hints(), QuizEvent::HintColorsUpdated(Vec::new()));
    }

    #[test]
    fn test_consecutive_rounds_never_repeat() {
        let mut s = session();
        let t0 = Instant::now();
        let mut previous = question_of(&s.next_round(t0).unwrap());
        for i in 0..100 {
            s.submit_slot(i % 7, t0).unwrap();
            let next = question_of(&s.next_round(t0).unwrap());
            assert_ne!(next.roomaji, previous.roomaji);
            previous = next;
        }
    }

    #[test]
    fn test_replay_previous() {
        let mut s = session();
        let t0 = Instant::now();
        assert_eq!(s.replay_previous(t0), Err(DrillError::NoActiveRound));
        let first = question_of(&s.next_round(t0).unwrap());
        assert_eq!(s.replay_previous(t0), Err(DrillError::NoPreviousRound));

        s.next_round(t0).unwrap();
        let replayed = question_of(&s.replay_previous(t0).unwrap());
        assert_eq!(replayed, first);
        assert_eq!(s.round().unwrap().previous, None);
        assert!(s.round().unwrap().is_awaiting());
        assert_eq!(s.replay_previous(t0), Err(DrillError::NoPreviousRound));

        let next = question_of(&s.next_round(t0).unwrap());
        assert_ne!(next.roomaji, first.roomaji);
        assert_eq!(s.round().unwrap().previous, Some(first));
    }

    #[test]
    fn test_changing_direction_discards_round() {
        let mut s = session();
        let t0 = Instant::now();
        s.next_round(t0).unwrap();
        s.set_direction(TestDirection::KatakanaToHiragana);
        assert!(s.round().is_none());
        assert_eq!(s.pool().direction(), Some(TestDirection::KatakanaToHiragana));
        assert!(s.submit_slot(0, t0).is_none());
    }

    #[test]
    fn test_hint_flag_change_keeps_round() {
        let mut s = session();
        s.next_round(Instant::now()).unwrap();
        s.set_hint_show_type(HintShowType::SHOW_ON_RIGHT_ANSWER);
        let round = s.round().unwrap();
        let slot = round
            .possible_answers
            .iter()
            .position(|a| *a == round.question)
            .unwrap();
        let QuizEvent::HintColorsUpdated(hints) = s.hints() else {
            panic!("expected hints");
        };
        for (i, hint) in hints.iter().enumerate() {
            assert_eq!(hint.is_visible(), i == slot);
        }
        assert_eq!(hints[slot], Hint::Visible(round.question.hiragana));
    }

    #[test]
    fn test_marked_slots_feed_hints() {
        let mut s = session();
        s.next_round(Instant::now()).unwrap();
        s.set_hint_show_type(HintShowType::SHOW_ON_MARKED_ANSWERS);
        s.toggle_mark(3);
        let QuizEvent::HintColorsUpdated(hints) = s.hints() else {
            panic!("expected hints");
        };
        let visible: Vec<usize> = (0..hints.len()).filter(|&i| hints[i].is_visible()).collect();
        assert_eq!(visible, vec![3]);
    }

    #[test]
    fn test_timeout_scores_wrong() {
        let settings = SessionSettings {
            answer_timeout: Some(Duration::from_secs(3)),
            ..SessionSettings::default()
        };
        let mut s = QuizSession::seeded(SignStatsStore::from_signs(CATALOG.iter()), settings, 2);
        let t0 = Instant::now();
        let question = question_of(&s.next_round(t0).unwrap());
        assert_eq!(s.timeout_progress(t0), Some(0.0));
        assert!(s.expire(t0 + Duration::from_secs(2)).is_none());
        let event = s.expire(t0 + Duration::from_secs(3)).unwrap();
        assert!(matches!(event, QuizEvent::AnswerScored { is_correct: false, .. }));
        let index = s.stats().index_of(&question).unwrap();
        assert_eq!(s.stats().get(index).unwrap().wrong_hiragana, 1);
        assert_eq!(s.timeout_progress(t0), None);
    }

    #[test]
    fn test_reset_rebuilds_pool() {
        let mut s = session();
        let t0 = Instant::now();
        let question = question_of(&s.next_round(t0).unwrap());
        let wrong = s
            .round()
            .unwrap()
            .possible_answers
            .iter()
            .copied()
            .find(|a| a.roomaji != question.roomaji)
            .unwrap();
        s.submit(&wrong, t0).unwrap();
        assert_eq!(s.pool().len(), CATALOG.len() + 1);
        s.reset(ResetScope::OnlyWrongHiragana);
        assert_eq!(s.pool().len(), CATALOG.len());
    }

    #[test]
    fn test_degenerate_category_selection_is_reported() {
        let settings = SessionSettings {
            categories: vec![KanaCategory::BaseSemiVoiced],
            ..SessionSettings::default()
        };
        let mut s = QuizSession::seeded(SignStatsStore::from_signs(CATALOG.iter()), settings, 4);
        assert!(matches!(
            s.next_round(Instant::now()),
            Err(DrillError::DegeneratePool { distinct: 5, required: 7 })
        ));
    }
}
