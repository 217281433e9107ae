use thiserror::Error;

pub type DrillResult<T> = Result<T, DrillError>;

/// Recoverable failures of the selection engine. The caller is expected to
/// widen the pool (enable more categories, lower the answer count) and retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrillError {
    #[error("test pool is empty")]
    EmptyPool,

    #[error("test pool has {distinct} distinct roomaji values, {required} required")]
    DegeneratePool { distinct: usize, required: usize },

    #[error("sampling gave up after {attempts} draws")]
    SelectionExhausted { attempts: usize },

    #[error("no round is active")]
    NoActiveRound,

    #[error("there is no previous question to go back to")]
    NoPreviousRound,
}
