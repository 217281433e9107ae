use std::time::{Duration, Instant};

use kanadrill::config::{Config, MAX_ANSWERS, MIN_ANSWERS};
use kanadrill::engine::{EitherAttribution, Hint, HintShowType, ResetScope, SignStatsStore, TestDirection};
use kanadrill::kana::{CATALOG, KanaCategory, Script, Sign};
use kanadrill::session::{QuizEvent, QuizSession, SessionSettings};
use kanadrill::store::json_store::JsonStore;
use kanadrill::store::schema::SignStatsData;

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Quiz,
    Stats,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingField {
    Direction,
    Answers,
    SimilarOnly,
    Hint(HintShowType),
    Timeout,
    ErrorHighlight,
    Attribution,
    Category(KanaCategory),
}

pub const SETTING_FIELDS: [SettingField; 16] = [
    SettingField::Direction,
    SettingField::Answers,
    SettingField::SimilarOnly,
    SettingField::Hint(HintShowType::SHOW_ON_WRONG_ANSWER),
    SettingField::Hint(HintShowType::SHOW_ON_RIGHT_ANSWER),
    SettingField::Hint(HintShowType::SHOW_ON_MARKED_ANSWERS),
    SettingField::Hint(HintShowType::SHOW_ON_OTHER_ANSWERS),
    SettingField::Timeout,
    SettingField::ErrorHighlight,
    SettingField::Attribution,
    SettingField::Category(KanaCategory::Base),
    SettingField::Category(KanaCategory::BaseVoiced),
    SettingField::Category(KanaCategory::BaseSemiVoiced),
    SettingField::Category(KanaCategory::Digraph),
    SettingField::Category(KanaCategory::DigraphVoiced),
    SettingField::Category(KanaCategory::DigraphSemiVoiced),
];

const TIMEOUT_STEP_MS: u64 = 1000;
const MAX_TIMEOUT_MS: u64 = 20_000;
const HIGHLIGHT_STEP_MS: u64 = 250;
const MAX_HIGHLIGHT_MS: u64 = 5000;

/// Display state of the current round, rebuilt from session events.
pub struct RoundView {
    pub question: Sign,
    pub ask: Script,
    pub answer_script: Script,
    pub answers: Vec<Sign>,
    pub last_result: Option<(bool, Duration)>,
}

pub struct App {
    pub screen: AppScreen,
    pub config: Config,
    pub theme: Theme,
    pub session: QuizSession,
    pub round: Option<RoundView>,
    pub hints: Vec<Hint>,
    pub status: Option<String>,
    pub mark_mode: bool,
    pub settings_selected: usize,
    pub reset_selected: usize,
    pub reset_confirm: bool,
    pub answered: u32,
    pub answered_correct: u32,
    pub should_quit: bool,
    store: Option<JsonStore>,
}

impl App {
    pub fn new(config: Config, store: Option<JsonStore>, seed: Option<u64>) -> Self {
        let mut stats = SignStatsStore::from_signs(CATALOG.iter());
        if let Some(ref s) = store {
            let applied = s.load_sign_stats().restore_into(&mut stats);
            tracing::info!(applied, "statistics loaded");
        }

        let settings = SessionSettings::from(&config);
        let session = match seed {
            Some(seed) => QuizSession::seeded(stats, settings, seed),
            None => QuizSession::from_entropy(stats, settings),
        };

        Self {
            screen: AppScreen::Quiz,
            config,
            theme: Theme::default(),
            session,
            round: None,
            hints: Vec::new(),
            status: None,
            mark_mode: false,
            settings_selected: 0,
            reset_selected: 0,
            reset_confirm: false,
            answered: 0,
            answered_correct: 0,
            should_quit: false,
            store,
        }
    }

    pub fn start_round(&mut self, now: Instant) {
        let result = self.session.next_round(now);
        self.show_round(result);
    }

    pub fn go_back(&mut self, now: Instant) {
        let result = self.session.replay_previous(now);
        self.show_round(result);
    }

    fn show_round(&mut self, result: kanadrill::DrillResult<QuizEvent>) {
        match result {
            Ok(QuizEvent::QuestionReady {
                question,
                ask,
                answer_script,
                possible_answers,
            }) => {
                self.round = Some(RoundView {
                    question,
                    ask,
                    answer_script,
                    answers: possible_answers,
                    last_result: None,
                });
                self.status = None;
                self.mark_mode = false;
                self.refresh_hints();
            }
            Ok(other) => tracing::warn!(?other, "unexpected event while starting a round"),
            Err(e) => {
                tracing::warn!(error = %e, "could not start round");
                self.status = Some(format!("{e}. Enable more categories or lower the answer count."));
            }
        }
    }

    pub fn answer(&mut self, slot: usize, now: Instant) {
        if let Some(event) = self.session.submit_slot(slot, now) {
            self.scored(event);
        }
    }

    /// Runs the time-driven parts of a round: timeout expiry and advancing
    /// once the highlight delay is over.
    pub fn tick(&mut self, now: Instant) {
        if self.screen != AppScreen::Quiz {
            return;
        }
        if let Some(event) = self.session.expire(now) {
            self.scored(event);
        }
        if self.session.is_ready(now) {
            self.start_round(now);
        }
    }

    fn scored(&mut self, event: QuizEvent) {
        if let QuizEvent::AnswerScored {
            is_correct,
            elapsed,
        } = event
        {
            self.answered += 1;
            if is_correct {
                self.answered_correct += 1;
            }
            if let Some(round) = self.round.as_mut() {
                round.last_result = Some((is_correct, elapsed));
            }
        }
        self.refresh_hints();
        self.save_stats();
    }

    pub fn toggle_mark(&mut self, slot: usize) {
        self.session.toggle_mark(slot);
        self.refresh_hints();
    }

    pub fn refresh_hints(&mut self) {
        if let QuizEvent::HintColorsUpdated(hints) = self.session.hints() {
            self.hints = hints;
        }
    }

    pub fn submitted(&self) -> Option<Sign> {
        self.session.round().and_then(|r| r.submitted().copied())
    }

    pub fn is_scored(&self) -> bool {
        self.session.round().is_some_and(|r| !r.is_awaiting())
    }

    pub fn reset_stats(&mut self, scope: ResetScope) {
        self.session.reset(scope);
        self.save_stats();
        self.status = Some(format!("Statistics reset ({})", scope.key()));
    }

    pub fn reset_scope(&self) -> ResetScope {
        ResetScope::ALL[self.reset_selected % ResetScope::ALL.len()]
    }

    pub fn cycle_reset_scope(&mut self, forward: bool) {
        self.reset_selected = step(self.reset_selected, ResetScope::ALL.len(), forward);
        self.reset_confirm = false;
    }

    pub fn confirm_reset(&mut self) {
        if self.reset_confirm {
            self.reset_stats(self.reset_scope());
            self.reset_confirm = false;
        } else {
            self.reset_confirm = true;
        }
    }

    pub fn save_stats(&self) {
        if let Some(ref store) = self.store {
            if let Err(e) = store.save_sign_stats(&SignStatsData::from_store(self.session.stats())) {
                tracing::warn!(error = %e, "failed to save statistics");
            }
        }
    }

    pub fn go_to_quiz(&mut self, now: Instant) {
        self.screen = AppScreen::Quiz;
        if self.session.round().is_none() {
            self.start_round(now);
        }
    }

    pub fn go_to_stats(&mut self) {
        self.screen = AppScreen::Stats;
        self.reset_confirm = false;
    }

    pub fn go_to_settings(&mut self) {
        self.screen = AppScreen::Settings;
    }

    /// Saves the configuration and hands the engine-relevant part to the session.
    pub fn leave_settings(&mut self, now: Instant) {
        self.config.normalize();
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "failed to save config");
        }
        self.session.apply_settings(SessionSettings::from(&self.config));
        self.refresh_hints();
        self.go_to_quiz(now);
    }

    pub fn settings_cycle_forward(&mut self) {
        self.settings_cycle(true);
    }

    pub fn settings_cycle_backward(&mut self) {
        self.settings_cycle(false);
    }

    fn settings_cycle(&mut self, forward: bool) {
        let Some(&field) = SETTING_FIELDS.get(self.settings_selected) else {
            return;
        };
        let c = &mut self.config;
        match field {
            SettingField::Direction => {
                let all = TestDirection::ALL;
                let idx = all.iter().position(|&d| d == c.test_direction).unwrap_or(0);
                c.test_direction = all[step(idx, all.len(), forward)];
            }
            SettingField::Answers => {
                c.maximum_answers = if forward {
                    (c.maximum_answers + 1).min(MAX_ANSWERS)
                } else {
                    c.maximum_answers.saturating_sub(1).max(MIN_ANSWERS)
                };
            }
            SettingField::SimilarOnly => c.similar_answers_only = !c.similar_answers_only,
            SettingField::Hint(flag) => c.hint_show_type.toggle(flag),
            SettingField::Timeout => {
                c.answer_timeout_ms = if forward {
                    (c.answer_timeout_ms + TIMEOUT_STEP_MS).min(MAX_TIMEOUT_MS)
                } else {
                    c.answer_timeout_ms.saturating_sub(TIMEOUT_STEP_MS)
                };
            }
            SettingField::ErrorHighlight => {
                c.error_highlight_ms = if forward {
                    (c.error_highlight_ms + HIGHLIGHT_STEP_MS).min(MAX_HIGHLIGHT_MS)
                } else {
                    c.error_highlight_ms.saturating_sub(HIGHLIGHT_STEP_MS)
                };
            }
            SettingField::Attribution => {
                c.roomaji_either_attribution = match c.roomaji_either_attribution {
                    EitherAttribution::Hiragana => EitherAttribution::AnswerScript,
                    EitherAttribution::AnswerScript => EitherAttribution::Hiragana,
                };
            }
            SettingField::Category(category) => c.toggle_category(category),
        }
    }

    pub fn setting_rows(&self) -> Vec<(String, String)> {
        let c = &self.config;
        SETTING_FIELDS
            .iter()
            .map(|field| match *field {
                SettingField::Direction => ("Direction".to_string(), c.test_direction.label().to_string()),
                SettingField::Answers => ("Answers".to_string(), c.maximum_answers.to_string()),
                SettingField::SimilarOnly => ("Similar answers only".to_string(), on_off(c.similar_answers_only)),
                SettingField::Hint(flag) => (
                    format!("Hint on {} answers", flag.names().join("")),
                    on_off(c.hint_show_type.contains(flag)),
                ),
                SettingField::Timeout => (
                    "Answer timeout".to_string(),
                    if c.answer_timeout_ms == 0 {
                        "off".to_string()
                    } else {
                        format!("{:.1}s", c.answer_timeout_ms as f64 / 1000.0)
                    },
                ),
                SettingField::ErrorHighlight => (
                    "Wrong answer highlight".to_string(),
                    format!("{:.2}s", c.error_highlight_ms as f64 / 1000.0),
                ),
                SettingField::Attribution => (
                    "Roomaji -> either counts as".to_string(),
                    match c.roomaji_either_attribution {
                        EitherAttribution::Hiragana => "hiragana".to_string(),
                        EitherAttribution::AnswerScript => "shown script".to_string(),
                    },
                ),
                SettingField::Category(category) => (
                    category.label().to_string(),
                    on_off(c.enabled_categories.contains(&category)),
                ),
            })
            .collect()
    }
}

fn step(idx: usize, len: usize, forward: bool) -> usize {
    if forward {
        (idx + 1) % len
    } else if idx == 0 {
        len - 1
    } else {
        idx - 1
    }
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Config::default(), None, Some(5))
    }

    #[test]
    fn test_wrong_answer_waits_for_highlight() {
        let mut app = app();
        let t0 = Instant::now();
        app.start_round(t0);
        let round = app.round.as_ref().unwrap();
        let wrong = round
            .answers
            .iter()
            .position(|a| a.roomaji != round.question.roomaji)
            .unwrap();
        let question = round.question;

        app.answer(wrong, t0);
        assert_eq!(app.answered, 1);
        assert_eq!(app.answered_correct, 0);
        app.tick(t0 + Duration::from_millis(100));
        assert_eq!(app.round.as_ref().unwrap().question, question);
        app.tick(t0 + Duration::from_millis(1500));
        assert!(app.round.as_ref().unwrap().last_result.is_none());
    }

    #[test]
    fn test_settings_cycle_wraps_direction() {
        let mut app = app();
        app.settings_selected = 0;
        app.settings_cycle_backward();
        assert_eq!(app.config.test_direction, TestDirection::HiraganaKatakanaBidirectional);
        app.settings_cycle_forward();
        assert_eq!(app.config.test_direction, TestDirection::HiraganaToRoomaji);
    }

    #[test]
    fn test_reset_needs_confirmation() {
        let mut app = app();
        let t0 = Instant::now();
        app.start_round(t0);
        let round = app.round.as_ref().unwrap();
        let right = round
            .answers
            .iter()
            .position(|a| a.roomaji == round.question.roomaji)
            .unwrap();
        app.answer(right, t0);
        assert_eq!(app.session.stats().summary().practiced_signs, 1);

        app.confirm_reset();
        assert_eq!(app.session.stats().summary().practiced_signs, 1);
        app.confirm_reset();
        assert_eq!(app.session.stats().summary().practiced_signs, 0);
        assert!(!app.reset_confirm);
    }

    #[test]
    fn test_setting_rows_match_fields() {
        let app = app();
        assert_eq!(app.setting_rows().len(), SETTING_FIELDS.len());
    }

    #[test]
    fn test_degenerate_settings_show_status() {
        let config = Config {
            enabled_categories: vec![KanaCategory::DigraphSemiVoiced],
            ..Config::default()
        };
        let mut app = App::new(config, None, Some(1));
        app.start_round(Instant::now());
        assert!(app.round.is_none());
        assert!(app.status.is_some());
    }
}
