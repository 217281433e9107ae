pub mod events;
pub mod quiz;

pub use events::QuizEvent;
pub use quiz::{QuizSession, SessionSettings};
