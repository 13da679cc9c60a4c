use crate::domain::{PlacementLogEntry, PlacementSession};
use vocab_config::CoreConfig;

/// Pure decisions of the adaptive placement engine over a [min, max] rank
/// interval. All I/O (persistence, catalog sampling) is the caller's
/// responsibility; this module only computes targets and interval updates.
pub struct PlacementEngine;

impl PlacementEngine {
    /// The difficulty rank to target for the next question, and whether that
    /// question is a regression probe. Position is 1-indexed (the question
    /// about to be asked is `question_count + 1`).
    pub fn next_target(session: &PlacementSession, config: &CoreConfig) -> (i64, bool) {
        let position = session.question_count + 1;
        let is_regression_probe =
            config.regression_interval > 0 && position % config.regression_interval == 0;

        let target = if is_regression_probe {
            regression_target(session.current_min, config.regression_factor)
        } else {
            (session.current_min + session.current_max) / 2
        };

        (target, is_regression_probe)
    }

    /// Records an answer to the question targeting `(target, is_regression_probe)`
    /// against `word_id`, narrows the [min, max] interval per the answer rules,
    /// and checks the stop conditions, finalizing the session if either is met.
    pub fn apply_answer(
        session: &mut PlacementSession,
        word_id: i64,
        target: i64,
        is_regression_probe: bool,
        is_known: bool,
        config: &CoreConfig,
    ) {
        if is_regression_probe {
            if !is_known {
                session.current_min = regression_target(session.current_min, config.regression_factor);
            }
            // known on a probe confirms the current range: no change.
        } else if is_known {
            session.current_min = target + 1;
        } else {
            session.current_max = target;
        }

        session.log.push(PlacementLogEntry {
            word_id,
            was_regression_probe: is_regression_probe,
            was_known: is_known,
        });
        session.question_count += 1;

        let range_below_min = (session.current_max - session.current_min) < config.min_range as i64;
        let count_at_max = session.question_count >= config.max_questions;
        if range_below_min || count_at_max {
            session.final_level = Some(final_level(session.current_min, session.current_max));
            session.is_active = false;
        }
    }

    pub fn final_level_of(session: &PlacementSession) -> i64 {
        final_level(session.current_min, session.current_max)
    }
}

fn regression_target(min: i64, regression_factor: f64) -> i64 {
    std::cmp::max(1, ((min as f64) * regression_factor).floor() as i64)
}

fn final_level(min: i64, max: i64) -> i64 {
    (min + max) / 2
}
