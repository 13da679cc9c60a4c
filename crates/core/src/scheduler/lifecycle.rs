use crate::domain::ProgressStatus;
use chrono::{DateTime, Duration, Utc};

/// Result of a triage event: the full replacement state for a progress entry,
/// independent of whatever it held before.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriageOutcome {
    pub status: ProgressStatus,
    pub repetition_number: u32,
    pub interval_days: u32,
    pub next_review_at: DateTime<Utc>,
}

/// triage "known" goes straight to Mastered (aggressive promotion); triage
/// "unknown" goes to Learning. Total over any prior status.
pub fn triage(is_known: bool, now: DateTime<Utc>, mastery_seed: u32) -> TriageOutcome {
    if is_known {
        TriageOutcome {
            status: ProgressStatus::Mastered,
            repetition_number: 1,
            interval_days: mastery_seed,
            next_review_at: now + Duration::days(mastery_seed as i64),
        }
    } else {
        TriageOutcome {
            status: ProgressStatus::Learning,
            repetition_number: 0,
            interval_days: 1,
            next_review_at: now + Duration::days(1),
        }
    }
}

/// Computes the post-review lifecycle status given the prior status, the
/// submitted quality, and the repetition_number/interval_days the SM-2
/// scheduler just produced for this review. Total: every (status, event) pair
/// yields exactly one next status.
///
/// Learning -> Review requires two consecutive passing reviews (repetition_number
/// reaching 2), the promotion rule the invariant in spec section 4.4 leaves as an
/// implementation choice.
pub fn next_status(
    current: ProgressStatus,
    quality: u8,
    repetition_number_after: u32,
    interval_days_after: u32,
    mastery_threshold: u32,
) -> ProgressStatus {
    if quality < 3 {
        return ProgressStatus::Learning;
    }

    match current {
        ProgressStatus::New => ProgressStatus::Review,
        ProgressStatus::Learning => {
            if repetition_number_after >= 2 {
                ProgressStatus::Review
            } else {
                ProgressStatus::Learning
            }
        }
        ProgressStatus::Review => {
            if interval_days_after >= mastery_threshold {
                ProgressStatus::Mastered
            } else {
                ProgressStatus::Review
            }
        }
        ProgressStatus::Mastered => ProgressStatus::Mastered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_known_promotes_to_mastered() {
        let now = Utc::now();
        let outcome = triage(true, now, 21);
        assert_eq!(outcome.status, ProgressStatus::Mastered);
        assert_eq!(outcome.repetition_number, 1);
        assert_eq!(outcome.interval_days, 21);
    }

    #[test]
    fn triage_unknown_moves_to_learning() {
        let now = Utc::now();
        let outcome = triage(false, now, 21);
        assert_eq!(outcome.status, ProgressStatus::Learning);
        assert_eq!(outcome.repetition_number, 0);
        assert_eq!(outcome.interval_days, 1);
    }

    #[test]
    fn failed_recall_always_drops_to_learning() {
        for current in [
            ProgressStatus::Learning,
            ProgressStatus::Review,
            ProgressStatus::Mastered,
        ] {
            assert_eq!(next_status(current, 2, 0, 1, 21), ProgressStatus::Learning);
        }
    }

    #[test]
    fn new_word_passing_moves_straight_to_review() {
        assert_eq!(next_status(ProgressStatus::New, 4, 1, 1, 21), ProgressStatus::Review);
    }

    #[test]
    fn learning_requires_two_consecutive_passes() {
        assert_eq!(
            next_status(ProgressStatus::Learning, 4, 1, 1, 21),
            ProgressStatus::Learning
        );
        assert_eq!(
            next_status(ProgressStatus::Learning, 4, 2, 6, 21),
            ProgressStatus::Review
        );
    }

    #[test]
    fn review_promotes_to_mastered_at_threshold() {
        assert_eq!(
            next_status(ProgressStatus::Review, 5, 3, 15, 21),
            ProgressStatus::Review
        );
        assert_eq!(
            next_status(ProgressStatus::Review, 5, 4, 21, 21),
            ProgressStatus::Mastered
        );
    }

    #[test]
    fn mastered_stays_mastered_on_pass() {
        assert_eq!(
            next_status(ProgressStatus::Mastered, 5, 1, 21, 21),
            ProgressStatus::Mastered
        );
    }
}
