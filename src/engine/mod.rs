pub mod direction;
pub mod distractor;
pub mod hint;
pub mod pool;
pub mod scoring;
pub mod selector;
pub mod sign_stats;

pub use direction::{EitherAttribution, RoundSides, StatSide, TestDirection};
pub use hint::{Hint, HintQuery, HintShowType};
pub use pool::TestPool;
pub use scoring::{Round, RoundState, ScoredAnswer};
pub use sign_stats::{ResetScope, SignRecord, SignStatsStore, StatsSummary};
