use crate::clock::Clock;
use crate::domain::{CoreError, LearnerId, PlacementSession, ProgressEntry, UnitStats, Word, WordId};
use crate::placement::PlacementEngine;
use crate::ports::{ActivityStore, LearnerAdmin, PlacementSessionStore, ProgressStore, WordCatalog};
use crate::scheduler::{self, lifecycle};
use crate::session::{self, WordWithStatus};
use std::future::Future;
use std::time::Duration;
use tracing::instrument;
use vocab_config::CoreConfig;

/// EF a word starts with before its first review (matches the canonical SM-2
/// starting value and, by default configuration, `CoreConfig::ef_max`).
const DEFAULT_EF: f64 = 2.5;

/// Façade exposing exactly the operations the surrounding HTTP/auth layer
/// (out of scope here) binds to endpoints. Every operation takes a deadline
/// and either completes or fails with `CoreError::DeadlineExceeded`.
pub struct Operations<C, P, S, A, L>
where
    C: WordCatalog,
    P: ProgressStore,
    S: PlacementSessionStore,
    A: ActivityStore,
    L: LearnerAdmin,
{
    catalog: C,
    progress: P,
    sessions: S,
    activity: A,
    learner_admin: L,
    config: CoreConfig,
    clock: Clock,
}

impl<C, P, S, A, L> Operations<C, P, S, A, L>
where
    C: WordCatalog,
    P: ProgressStore,
    S: PlacementSessionStore,
    A: ActivityStore,
    L: LearnerAdmin,
{
    pub fn new(
        catalog: C,
        progress: P,
        sessions: S,
        activity: A,
        learner_admin: L,
        config: CoreConfig,
        clock: Clock,
    ) -> Self {
        Self { catalog, progress, sessions, activity, learner_admin, config, clock }
    }

    #[instrument(skip(self))]
    pub async fn placement_start(
        &self,
        learner: &LearnerId,
        deadline: Duration,
    ) -> Result<(PlacementSession, Word, bool), CoreError> {
        with_deadline(deadline, async {
            let session = match self.sessions.get_active(learner).await? {
                Some(existing) => existing,
                None => {
                    let now = self.clock.now();
                    let fresh = PlacementSession {
                        id: new_session_id(),
                        learner_id: learner.clone(),
                        current_min: 1,
                        current_max: 100,
                        question_count: 0,
                        is_active: true,
                        final_level: None,
                        log: Vec::new(),
                        created_at: now,
                        updated_at: now,
                    };
                    self.sessions.create_active(fresh).await?
                }
            };

            let (target, is_regression) = PlacementEngine::next_target(&session, &self.config);
            let excluded: Vec<WordId> = session.seen_word_ids().collect();
            let word = self.catalog.sample_near(target, None, &excluded).await?;
            Ok((session, word, is_regression))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn placement_answer(
        &self,
        learner: &LearnerId,
        is_known: bool,
        deadline: Duration,
    ) -> Result<(PlacementSession, Option<Word>, bool, bool, Option<i64>), CoreError> {
        with_deadline(deadline, async {
            let mut session = self
                .sessions
                .get_active(learner)
                .await?
                .ok_or_else(|| CoreError::NotFound(format!("no active placement session for {learner}")))?;
            let expected_question_count = session.question_count;

            let (target, is_regression) = PlacementEngine::next_target(&session, &self.config);
            let excluded: Vec<WordId> = session.seen_word_ids().collect();
            let answered_word = self.catalog.sample_near(target, None, &excluded).await?;

            PlacementEngine::apply_answer(
                &mut session,
                answered_word.id,
                target,
                is_regression,
                is_known,
                &self.config,
            );

            if session.is_active {
                let (next_target, _) = PlacementEngine::next_target(&session, &self.config);
                let excluded: Vec<WordId> = session.seen_word_ids().collect();
                match self.catalog.sample_near(next_target, None, &excluded).await {
                    Ok(next_word) => {
                        let saved = self.sessions.save(session, expected_question_count).await?;
                        return Ok((saved, Some(next_word), is_regression, false, None));
                    }
                    Err(CoreError::Exhausted(_)) => {
                        // Terminal per §7: no remaining candidate word finalizes the
                        // session at the current midpoint rather than looping.
                        session.final_level = Some(PlacementEngine::final_level_of(&session));
                        session.is_active = false;
                    }
                    Err(other) => return Err(other),
                }
            }

            let final_level = session.final_level;
            let saved = self.sessions.save(session, expected_question_count).await?;
            Ok((saved, None, is_regression, true, final_level))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn placement_current(
        &self,
        learner: &LearnerId,
        deadline: Duration,
    ) -> Result<Option<PlacementSession>, CoreError> {
        with_deadline(deadline, async { self.sessions.get_active(learner).await }).await
    }

    #[instrument(skip(self))]
    pub async fn triage(
        &self,
        learner: &LearnerId,
        word_id: WordId,
        is_known: bool,
        deadline: Duration,
    ) -> Result<ProgressEntry, CoreError> {
        with_deadline(deadline, async {
            self.catalog.get(word_id).await?;
            let prior = self
                .progress
                .get_or_create(learner, word_id, ProgressEntry::new_entry(learner.clone(), word_id, DEFAULT_EF))
                .await?;

            let outcome = lifecycle::triage(is_known, self.clock.now(), self.config.mastery_seed);
            let updated = ProgressEntry {
                status: outcome.status,
                repetition_number: outcome.repetition_number,
                interval_days: outcome.interval_days,
                next_review_at: Some(outcome.next_review_at),
                // Whether triage touches last_reviewed_at is unspecified upstream;
                // this core leaves it untouched -- only review events set it.
                ..prior
            };
            self.progress.update(updated).await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn review_session(
        &self,
        learner: &LearnerId,
        limit: Option<u32>,
        deadline: Duration,
    ) -> Result<Vec<WordWithStatus>, CoreError> {
        with_deadline(deadline, async {
            session::review_session(&self.progress, &self.catalog, learner, self.clock.now(), limit).await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn review_unit_filter(
        &self,
        learner: &LearnerId,
        unit: i64,
        deadline: Duration,
    ) -> Result<Vec<WordWithStatus>, CoreError> {
        validate_unit(unit)?;
        with_deadline(deadline, async {
            session::unit_filter_session(&self.progress, &self.catalog, learner, unit).await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn review_unit_learned(
        &self,
        learner: &LearnerId,
        unit: i64,
        deadline: Duration,
    ) -> Result<Vec<WordWithStatus>, CoreError> {
        validate_unit(unit)?;
        with_deadline(deadline, async {
            session::unit_learned_pool(&self.progress, &self.catalog, learner, unit).await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn review_submit(
        &self,
        learner: &LearnerId,
        word_id: WordId,
        quality: u8,
        deadline: Duration,
    ) -> Result<(ProgressEntry, bool, u32, u32), CoreError> {
        validate_quality(quality)?;
        with_deadline(deadline, async {
            self.catalog.get(word_id).await?;
            let prior = self
                .progress
                .get_or_create(learner, word_id, ProgressEntry::new_entry(learner.clone(), word_id, DEFAULT_EF))
                .await?;

            let now = self.clock.now();
            let outcome = scheduler::apply_sm2(&prior, quality, now, self.config.ef_min, self.config.ef_max)?;
            let new_status = lifecycle::next_status(
                prior.status,
                quality,
                outcome.repetition_number,
                outcome.interval_days,
                self.config.mastery_threshold,
            );

            let updated = ProgressEntry {
                status: new_status,
                repetition_number: outcome.repetition_number,
                easiness_factor: outcome.easiness_factor,
                interval_days: outcome.interval_days,
                next_review_at: Some(outcome.next_review_at),
                last_reviewed_at: Some(outcome.last_reviewed_at),
                ..prior
            };
            let persisted = self.progress.update(updated).await?;

            let mut activity = self.activity.get(learner).await?;
            let today = now.date_naive();
            let goal_reached = crate::activity::record_review(&mut activity, today, self.config.daily_goal);
            let saved_activity = self.activity.save(activity).await?;

            Ok((persisted, goal_reached, saved_activity.today_count, saved_activity.streak))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn stats_by_unit(
        &self,
        learner: &LearnerId,
        deadline: Duration,
    ) -> Result<(Vec<UnitStats>, UnitStats), CoreError> {
        with_deadline(deadline, async {
            let units = self.catalog.units().await?;
            let learned_by_unit = self.progress.count_by_unit(learner).await?;

            let mut rows = Vec::with_capacity(units.len());
            let mut total_learned = 0i64;
            let mut total_words = 0i64;
            for unit in units {
                let total_count = self.catalog.words_in_unit(unit).await?.len() as i64;
                let learned_count = learned_by_unit
                    .iter()
                    .find(|(u, _)| *u == unit)
                    .map(|(_, count)| *count)
                    .unwrap_or(0);
                let percent = if total_count == 0 { 0.0 } else { (learned_count as f64 / total_count as f64) * 100.0 };
                total_learned += learned_count;
                total_words += total_count;
                rows.push(UnitStats { unit, learned_count, total_count, percent });
            }

            let overall = UnitStats::overall(total_learned, total_words);
            Ok((rows, overall))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn stats_user(&self, learner: &LearnerId, deadline: Duration) -> Result<(u32, u32, u32), CoreError> {
        with_deadline(deadline, async {
            let activity = self.activity.get(learner).await?;
            Ok((activity.streak, activity.today_count, self.config.daily_goal))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn distractors(&self, word_id: WordId, n: usize, deadline: Duration) -> Result<Vec<Word>, CoreError> {
        with_deadline(deadline, async {
            let correct = self.catalog.get(word_id).await?;
            session::distractors::generate(&self.catalog, &correct, n, word_id as u64).await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_learner(&self, learner: &LearnerId, deadline: Duration) -> Result<(), CoreError> {
        with_deadline(deadline, async { self.learner_admin.delete_learner(learner).await }).await
    }
}

fn validate_unit(unit: i64) -> Result<(), CoreError> {
    if unit < 1 {
        return Err(CoreError::InvalidArgument(format!("unit must be >= 1, got {unit}")));
    }
    Ok(())
}

/// Rejects an out-of-range quality before it can trigger any storage
/// mutation. `scheduler::apply_sm2` re-checks the same bound -- it has to
/// stay total and self-contained -- but by the time it runs, `review_submit`
/// must not have created or touched a `Progress` row yet.
fn validate_quality(quality: u8) -> Result<(), CoreError> {
    if quality > 5 {
        return Err(CoreError::InvalidArgument(format!("quality must be in 0..=5, got {quality}")));
    }
    Ok(())
}

async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, CoreError>
where
    F: Future<Output = Result<T, CoreError>>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| CoreError::DeadlineExceeded)?
}

fn new_session_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    format!("placement-{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{
        MockActivityStore, MockLearnerAdmin, MockPlacementSessionStore, MockProgressStore, MockWordCatalog,
    };
    use mockall::predicate::*;

    fn word(id: i64, rank: i64) -> Word {
        Word {
            id,
            unit: 1,
            difficulty_rank: rank,
            source_form: format!("s{id}"),
            target_form: format!("t{id}"),
            audio_ref: None,
        }
    }

    #[tokio::test]
    async fn placement_start_creates_session_and_first_question() {
        let mut sessions = MockPlacementSessionStore::new();
        sessions.expect_get_active().returning(|_| Ok(None));
        sessions
            .expect_create_active()
            .returning(|session| Ok(session));

        let mut catalog = MockWordCatalog::new();
        catalog
            .expect_sample_near()
            .with(eq(50i64), eq(None::<i64>), always())
            .returning(|_, _, _| Ok(word(1, 50)));

        let ops = Operations::new(
            catalog,
            MockProgressStore::new(),
            sessions,
            MockActivityStore::new(),
            MockLearnerAdmin::new(),
            CoreConfig::default(),
            Clock::Fixed(chrono::Utc::now()),
        );

        let (session, first_word, is_probe) = ops
            .placement_start(&"learner-1".to_string(), Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(session.question_count, 0);
        assert!(session.is_active);
        assert_eq!(first_word.id, 1);
        assert!(!is_probe);
    }

    #[tokio::test]
    async fn placement_answer_without_active_session_is_not_found() {
        let mut sessions = MockPlacementSessionStore::new();
        sessions.expect_get_active().returning(|_| Ok(None));

        let ops = Operations::new(
            MockWordCatalog::new(),
            MockProgressStore::new(),
            sessions,
            MockActivityStore::new(),
            MockLearnerAdmin::new(),
            CoreConfig::default(),
            Clock::Fixed(chrono::Utc::now()),
        );

        let err = ops
            .placement_answer(&"learner-1".to_string(), true, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn placement_answer_finalizes_on_catalog_exhaustion() {
        let mut sessions = MockPlacementSessionStore::new();
        let active = PlacementSession {
            id: "s1".to_string(),
            learner_id: "learner-1".to_string(),
            current_min: 1,
            current_max: 100,
            question_count: 0,
            is_active: true,
            final_level: None,
            log: Vec::new(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        sessions.expect_get_active().returning(move |_| Ok(Some(active.clone())));
        sessions.expect_save().returning(|session, _| Ok(session));

        let mut catalog = MockWordCatalog::new();
        catalog.expect_sample_near().returning(|target, _, _| {
            if target == 50 {
                Ok(word(1, 50))
            } else {
                Err(CoreError::Exhausted("no candidates left".to_string()))
            }
        });

        let ops = Operations::new(
            catalog,
            MockProgressStore::new(),
            sessions,
            MockActivityStore::new(),
            MockLearnerAdmin::new(),
            CoreConfig::default(),
            Clock::Fixed(chrono::Utc::now()),
        );

        let (session, next_word, _, is_finished, final_level) = ops
            .placement_answer(&"learner-1".to_string(), true, Duration::from_secs(1))
            .await
            .unwrap();

        assert!(!session.is_active);
        assert!(next_word.is_none());
        assert!(is_finished);
        assert!(final_level.is_some());
    }

    #[tokio::test]
    async fn placement_answer_propagates_non_exhaustion_errors() {
        let mut sessions = MockPlacementSessionStore::new();
        let active = PlacementSession {
            id: "s1".to_string(),
            learner_id: "learner-1".to_string(),
            current_min: 1,
            current_max: 100,
            question_count: 0,
            is_active: true,
            final_level: None,
            log: Vec::new(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        sessions.expect_get_active().returning(move |_| Ok(Some(active.clone())));

        let mut catalog = MockWordCatalog::new();
        catalog.expect_sample_near().returning(|target, _, _| {
            if target == 50 {
                Ok(word(1, 50))
            } else {
                Err(CoreError::Internal(anyhow::anyhow!("transient storage failure")))
            }
        });

        let ops = Operations::new(
            catalog,
            MockProgressStore::new(),
            sessions,
            MockActivityStore::new(),
            MockLearnerAdmin::new(),
            CoreConfig::default(),
            Clock::Fixed(chrono::Utc::now()),
        );

        let err = ops
            .placement_answer(&"learner-1".to_string(), true, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[tokio::test]
    async fn review_submit_rejects_out_of_range_quality() {
        // No expectations set on catalog/progress: an out-of-range quality must
        // be rejected before either is touched, so a mock call here would panic.
        let ops = Operations::new(
            MockWordCatalog::new(),
            MockProgressStore::new(),
            MockPlacementSessionStore::new(),
            MockActivityStore::new(),
            MockLearnerAdmin::new(),
            CoreConfig::default(),
            Clock::Fixed(chrono::Utc::now()),
        );

        let err = ops
            .review_submit(&"learner-1".to_string(), 1, 9, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn review_unit_filter_rejects_invalid_unit() {
        let ops = Operations::new(
            MockWordCatalog::new(),
            MockProgressStore::new(),
            MockPlacementSessionStore::new(),
            MockActivityStore::new(),
            MockLearnerAdmin::new(),
            CoreConfig::default(),
            Clock::Fixed(chrono::Utc::now()),
        );

        let err = ops
            .review_unit_filter(&"learner-1".to_string(), 0, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }
}
