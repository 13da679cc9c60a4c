//! Database row types, translated to/from `vocab_core::domain` types at the
//! edge of each repository method.

use sqlx::FromRow;
use vocab_core::{PlacementLogEntry, PlacementSession, ProgressEntry, ProgressStatus, Word};

#[derive(Debug, Clone, FromRow)]
pub struct WordRow {
    pub id: i64,
    pub unit: i64,
    pub difficulty_rank: i64,
    pub source_form: String,
    pub target_form: String,
    pub audio_ref: Option<String>,
}

impl From<WordRow> for Word {
    fn from(row: WordRow) -> Self {
        Word {
            id: row.id,
            unit: row.unit,
            difficulty_rank: row.difficulty_rank,
            source_form: row.source_form,
            target_form: row.target_form,
            audio_ref: row.audio_ref,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProgressRow {
    pub learner_id: String,
    pub word_id: i64,
    pub status: String,
    pub repetition_number: i64,
    pub easiness_factor: f64,
    pub interval_days: i64,
    pub next_review_at: Option<i64>,
    pub last_reviewed_at: Option<i64>,
}

impl From<ProgressRow> for ProgressEntry {
    fn from(row: ProgressRow) -> Self {
        ProgressEntry {
            learner_id: row.learner_id,
            word_id: row.word_id,
            status: status_from_str(&row.status),
            repetition_number: row.repetition_number as u32,
            easiness_factor: row.easiness_factor,
            interval_days: row.interval_days as u32,
            next_review_at: row.next_review_at.and_then(chrono::DateTime::from_timestamp_millis),
            last_reviewed_at: row.last_reviewed_at.and_then(chrono::DateTime::from_timestamp_millis),
        }
    }
}

pub fn status_to_str(status: ProgressStatus) -> &'static str {
    status.as_str()
}

pub fn status_from_str(s: &str) -> ProgressStatus {
    match s {
        "learning" => ProgressStatus::Learning,
        "review" => ProgressStatus::Review,
        "mastered" => ProgressStatus::Mastered,
        _ => ProgressStatus::New,
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PlacementSessionRow {
    pub id: String,
    pub learner_id: String,
    pub current_min: i64,
    pub current_max: i64,
    pub question_count: i64,
    pub is_active: i64,
    pub final_level: Option<i64>,
    pub log: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PlacementSessionRow {
    pub fn into_domain(self) -> Result<PlacementSession, serde_json::Error> {
        let log: Vec<PlacementLogEntry> = serde_json::from_str(&self.log)?;
        Ok(PlacementSession {
            id: self.id,
            learner_id: self.learner_id,
            current_min: self.current_min,
            current_max: self.current_max,
            question_count: self.question_count as u32,
            is_active: self.is_active != 0,
            final_level: self.final_level,
            log,
            created_at: chrono::DateTime::from_timestamp_millis(self.created_at).unwrap_or_else(chrono::Utc::now),
            updated_at: chrono::DateTime::from_timestamp_millis(self.updated_at).unwrap_or_else(chrono::Utc::now),
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DailyActivityRow {
    pub learner_id: String,
    pub streak: i64,
    pub last_active_day: Option<String>,
    pub today_count: i64,
    pub today_day: Option<String>,
}

impl DailyActivityRow {
    pub fn into_domain(self) -> vocab_core::DailyActivity {
        vocab_core::DailyActivity {
            learner_id: self.learner_id,
            streak: self.streak as u32,
            last_active_day: self.last_active_day.and_then(|d| d.parse().ok()),
            today_count: self.today_count as u32,
            today_day: self.today_day.and_then(|d| d.parse().ok()),
        }
    }
}
