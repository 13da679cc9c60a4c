use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type LearnerId = String;
pub type WordId = i64;
pub type SessionId = String;

/// A catalog word. Read-only to the core; difficulty rank is stable for the
/// lifetime of a word id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub unit: i64,
    pub difficulty_rank: i64,
    pub source_form: String,
    pub target_form: String,
    pub audio_ref: Option<String>,
}

/// Lifecycle status of a (learner, word) progress entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressStatus {
    New,
    Learning,
    Review,
    Mastered,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::New => "new",
            ProgressStatus::Learning => "learning",
            ProgressStatus::Review => "review",
            ProgressStatus::Mastered => "mastered",
        }
    }
}

/// Per (learner, word) SM-2 + lifecycle state. Exactly one per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub learner_id: LearnerId,
    pub word_id: WordId,
    pub status: ProgressStatus,
    pub repetition_number: u32,
    pub easiness_factor: f64,
    pub interval_days: u32,
    pub next_review_at: Option<DateTime<Utc>>,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl ProgressEntry {
    /// The synthetic "never reviewed" zero-state for a (learner, word) pair that
    /// has no row yet. Used as the Scheduler's prior state on first contact.
    pub fn new_entry(learner_id: LearnerId, word_id: WordId, ef_default: f64) -> Self {
        Self {
            learner_id,
            word_id,
            status: ProgressStatus::New,
            repetition_number: 0,
            easiness_factor: ef_default,
            interval_days: 0,
            next_review_at: None,
            last_reviewed_at: None,
        }
    }
}

/// One entry in a placement session's audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementLogEntry {
    pub word_id: WordId,
    pub was_regression_probe: bool,
    pub was_known: bool,
}

/// Per-learner adaptive placement session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSession {
    pub id: SessionId,
    pub learner_id: LearnerId,
    pub current_min: i64,
    pub current_max: i64,
    pub question_count: u32,
    pub is_active: bool,
    pub final_level: Option<i64>,
    pub log: Vec<PlacementLogEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlacementSession {
    pub fn seen_word_ids(&self) -> impl Iterator<Item = WordId> + '_ {
        self.log.iter().map(|entry| entry.word_id)
    }
}

/// Per-learner streak and daily-goal counters, derived from review events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub learner_id: LearnerId,
    pub streak: u32,
    pub last_active_day: Option<NaiveDate>,
    pub today_count: u32,
    pub today_day: Option<NaiveDate>,
}

impl DailyActivity {
    pub fn new(learner_id: LearnerId) -> Self {
        Self {
            learner_id,
            streak: 0,
            last_active_day: None,
            today_count: 0,
            today_day: None,
        }
    }
}

/// Aggregate learned/total counts for one unit, plus the trailing overall row
/// (sentinel `unit = 0`) that `stats.by_unit` appends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    pub unit: i64,
    pub learned_count: i64,
    pub total_count: i64,
    pub percent: f64,
}

impl UnitStats {
    pub fn overall(learned_count: i64, total_count: i64) -> Self {
        let percent = if total_count == 0 {
            0.0
        } else {
            (learned_count as f64 / total_count as f64) * 100.0
        };
        Self {
            unit: 0,
            learned_count,
            total_count,
            percent,
        }
    }
}
