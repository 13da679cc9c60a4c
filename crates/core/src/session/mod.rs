pub mod assembler;
pub mod distractors;

pub use assembler::{review_session, unit_filter_session, unit_learned_pool, WordWithStatus};
