use crate::domain::{CoreError, ProgressEntry};
use chrono::{DateTime, Duration, Utc};

/// Result of applying one SM-2 recurrence step. Deliberately separate from
/// `ProgressEntry` -- the caller (the Lifecycle Machine) decides what `status`
/// these numbers imply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sm2Outcome {
    pub repetition_number: u32,
    pub easiness_factor: f64,
    pub interval_days: u32,
    pub next_review_at: DateTime<Utc>,
    pub last_reviewed_at: DateTime<Utc>,
}

/// Pure SM-2 recurrence. `prior` is the progress entry before this review
/// (the synthetic zero-state is a valid input for a never-reviewed word).
/// `quality` is the canonical 0-5 scale; validation of its range happens at
/// the boundary, not here -- this function is total over `0..=5`.
pub fn apply(prior: &ProgressEntry, quality: u8, now: DateTime<Utc>, ef_min: f64, ef_max: f64) -> Result<Sm2Outcome, CoreError> {
    if quality > 5 {
        return Err(CoreError::InvalidArgument(format!(
            "quality must be in 0..=5, got {quality}"
        )));
    }

    let q = quality as f64;
    let ef_prime = prior.easiness_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    let easiness_factor = ef_prime.clamp(ef_min, ef_max);

    let (repetition_number, interval_days) = if quality < 3 {
        (0, 1)
    } else {
        let interval = match prior.repetition_number {
            0 => 1,
            1 => 6,
            _ => round_half_up(prior.interval_days as f64 * easiness_factor),
        };
        (prior.repetition_number + 1, interval)
    };

    let next_review_at = next_day_boundary(now, interval_days);

    Ok(Sm2Outcome {
        repetition_number,
        easiness_factor,
        interval_days,
        next_review_at,
        last_reviewed_at: now,
    })
}

/// `now` advanced by `days` whole days. Day-boundary rounding in the learner's
/// timezone is the Session Assembler's concern when it later compares against
/// `at_time`; here we only need the duration to be a whole number of days.
fn next_day_boundary(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now + Duration::days(days as i64)
}

fn round_half_up(value: f64) -> u32 {
    value.floor() as u32 + if value.fract() >= 0.5 { 1 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LearnerId, ProgressEntry, ProgressStatus, WordId};

    fn fresh(ef: f64, repetition_number: u32, interval_days: u32) -> ProgressEntry {
        ProgressEntry {
            learner_id: "learner-1".to_string() as LearnerId,
            word_id: 1 as WordId,
            status: ProgressStatus::New,
            repetition_number,
            easiness_factor: ef,
            interval_days,
            next_review_at: None,
            last_reviewed_at: None,
        }
    }

    #[test]
    fn scenario_b_canonical_sequence() {
        let now = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let mut state = fresh(2.5, 0, 0);

        let step1 = apply(&state, 5, now, 1.3, 2.5).unwrap();
        assert_eq!(step1.repetition_number, 1);
        assert_eq!(step1.easiness_factor, 2.5);
        assert_eq!(step1.interval_days, 1);
        state.repetition_number = step1.repetition_number;
        state.easiness_factor = step1.easiness_factor;
        state.interval_days = step1.interval_days;

        let step2 = apply(&state, 5, now, 1.3, 2.5).unwrap();
        assert_eq!(step2.repetition_number, 2);
        assert_eq!(step2.easiness_factor, 2.5);
        assert_eq!(step2.interval_days, 6);
        state.repetition_number = step2.repetition_number;
        state.easiness_factor = step2.easiness_factor;
        state.interval_days = step2.interval_days;

        let step3 = apply(&state, 5, now, 1.3, 2.5).unwrap();
        assert_eq!(step3.repetition_number, 3);
        assert_eq!(step3.easiness_factor, 2.5);
        assert_eq!(step3.interval_days, 15);
        state.repetition_number = step3.repetition_number;
        state.easiness_factor = step3.easiness_factor;
        state.interval_days = step3.interval_days;

        let step4 = apply(&state, 2, now, 1.3, 2.5).unwrap();
        assert_eq!(step4.repetition_number, 0);
        assert!((step4.easiness_factor - 2.18).abs() < 1e-9);
        assert_eq!(step4.interval_days, 1);
    }

    #[test]
    fn scenario_d_serial_application_from_rep_2() {
        let now = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc);
        let state = fresh(2.5, 2, 6);

        let first = apply(&state, 5, now, 1.3, 2.5).unwrap();
        assert_eq!(first.repetition_number, 3);
        assert_eq!(first.interval_days, 15);

        let mut intermediate = state;
        intermediate.repetition_number = first.repetition_number;
        intermediate.easiness_factor = first.easiness_factor;
        intermediate.interval_days = first.interval_days;

        let second = apply(&intermediate, 5, now, 1.3, 2.5).unwrap();
        assert_eq!(second.repetition_number, 4);
        assert_eq!(second.interval_days, 38);
    }

    #[test]
    fn ef_never_leaves_bounds() {
        let state = fresh(1.3, 5, 30);
        let outcome = apply(&state, 0, Utc::now(), 1.3, 2.5).unwrap();
        assert!(outcome.easiness_factor >= 1.3 && outcome.easiness_factor <= 2.5);
        assert_eq!(outcome.repetition_number, 0);
        assert_eq!(outcome.interval_days, 1);
    }

    #[test]
    fn rejects_out_of_range_quality() {
        let state = fresh(2.5, 0, 0);
        let err = apply(&state, 6, Utc::now(), 1.3, 2.5).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }
}
