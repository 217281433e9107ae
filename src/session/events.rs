use std::time::Duration;

use crate::engine::hint::Hint;
use crate::kana::{Script, Sign};

/// Plain data handed to the front-end after each engine step.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizEvent {
    QuestionReady {
        question: Sign,
        ask: Script,
        answer_script: Script,
        possible_answers: Vec<Sign>,
    },
    AnswerScored {
        is_correct: bool,
        elapsed: Duration,
    },
    HintColorsUpdated(Vec<Hint>),
}
