pub mod lifecycle;
pub mod sm2;

pub use lifecycle::{next_status, triage, TriageOutcome};
pub use sm2::{apply as apply_sm2, Sm2Outcome};
