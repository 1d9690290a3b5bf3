use crate::analytics::taxonomy::Category;
use crate::analytics::trend::{classify_deltas, classify_outcomes, Outcome, TrendLabel};
use crate::store::operations::answers::AnswerEvent;
use crate::store::operations::skill_stats::SkillStats;
use crate::store::operations::users::User;
use crate::store::{Store, StoreError};

/// Read access the analytics engine needs from the document store.
pub trait SkillDataSource {
    fn find_user(&self, account_id: &str) -> Result<Option<User>, StoreError>;

    fn skill_stats_for(&self, account_id: &str) -> Result<Vec<SkillStats>, StoreError>;

    /// Newest first; `None` means the whole log.
    fn answers_for(
        &self,
        account_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AnswerEvent>, StoreError>;
}

impl SkillDataSource for Store {
    fn find_user(&self, account_id: &str) -> Result<Option<User>, StoreError> {
        self.get_user_by_id(account_id)
    }

    fn skill_stats_for(&self, account_id: &str) -> Result<Vec<SkillStats>, StoreError> {
        self.get_skill_stats_by_user(account_id)
    }

    fn answers_for(
        &self,
        account_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AnswerEvent>, StoreError> {
        self.get_answers_by_user(account_id, limit)
    }
}

/// The one source of per-category figures chosen for a request.
///
/// Resolved once and passed down, so a single analysis never mixes
/// aggregate figures with figures recomputed from events.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsSource {
    Aggregated(Vec<SkillStats>),
    Recomputed(Vec<AnswerEvent>),
}

/// Extra signals only the aggregate projection carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateSignals {
    pub weekly_trend: f64,
    pub monthly_trend: f64,
    pub average_difficulty: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFigures {
    pub category: Category,
    pub total: u64,
    pub correct: u64,
    pub trend: TrendLabel,
    pub signals: Option<AggregateSignals>,
}

impl StatsSource {
    /// Prefers the aggregate projection; reads the full answer log only
    /// when the account has no aggregates at all.
    pub fn load<S: SkillDataSource + ?Sized>(
        source: &S,
        account_id: &str,
    ) -> Result<Self, StoreError> {
        let aggregates = source.skill_stats_for(account_id)?;
        if !aggregates.is_empty() {
            tracing::debug!(account_id, count = aggregates.len(), "Using aggregate projection");
            return Ok(StatsSource::Aggregated(aggregates));
        }

        let events = source.answers_for(account_id, None)?;
        tracing::debug!(
            account_id,
            count = events.len(),
            "No aggregate projection, recomputing from answer log"
        );
        Ok(StatsSource::Recomputed(events))
    }

    /// Same policy as [`StatsSource::load`] for callers that already hold both inputs.
    pub fn select(aggregates: Vec<SkillStats>, events: Vec<AnswerEvent>) -> Self {
        if aggregates.is_empty() {
            StatsSource::Recomputed(events)
        } else {
            StatsSource::Aggregated(aggregates)
        }
    }

    pub fn is_aggregated(&self) -> bool {
        matches!(self, StatsSource::Aggregated(_))
    }

    /// Per-category figures in encounter order.
    ///
    /// The aggregate path yields one entry per stored aggregate. The event
    /// path yields all five categories, empty ones included, in taxonomy order.
    pub fn category_figures(&self) -> Vec<CategoryFigures> {
        match self {
            StatsSource::Aggregated(aggregates) => aggregates
                .iter()
                .map(|stats| CategoryFigures {
                    category: stats.category,
                    total: stats.total_quizzes,
                    correct: stats.correct_count,
                    trend: classify_deltas(stats.weekly_trend, stats.monthly_trend),
                    signals: Some(AggregateSignals {
                        weekly_trend: stats.weekly_trend,
                        monthly_trend: stats.monthly_trend,
                        average_difficulty: stats.average_difficulty,
                    }),
                })
                .collect(),
            StatsSource::Recomputed(events) => {
                let mut buckets: Vec<Vec<Outcome>> = vec![Vec::new(); Category::ALL.len()];
                for event in events {
                    buckets[event.category.index()].push(Outcome {
                        answered_at: event.answered_at,
                        is_correct: event.is_correct,
                    });
                }

                Category::ALL
                    .iter()
                    .zip(buckets)
                    .map(|(&category, outcomes)| CategoryFigures {
                        category,
                        total: outcomes.len() as u64,
                        correct: outcomes.iter().filter(|o| o.is_correct).count() as u64,
                        trend: classify_outcomes(&outcomes),
                        signals: None,
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use chrono::{DateTime, Duration, Utc};

    use super::*;
    use crate::analytics::taxonomy::{Difficulty, Platform};

    /// In-memory source that counts answer-log reads.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub user: Option<User>,
        pub stats: Vec<SkillStats>,
        pub answers: Vec<AnswerEvent>,
        pub answer_reads: Cell<usize>,
        pub fail: bool,
    }

    impl FakeSource {
        pub(crate) fn with_user(account_id: &str) -> Self {
            Self {
                user: Some(User::new(account_id, Platform::Github)),
                ..Self::default()
            }
        }
    }

    impl SkillDataSource for FakeSource {
        fn find_user(&self, _account_id: &str) -> Result<Option<User>, StoreError> {
            Ok(self.user.clone())
        }

        fn skill_stats_for(&self, _account_id: &str) -> Result<Vec<SkillStats>, StoreError> {
            if self.fail {
                return Err(StoreError::Validation("backend offline".to_string()));
            }
            Ok(self.stats.clone())
        }

        fn answers_for(
            &self,
            _account_id: &str,
            limit: Option<usize>,
        ) -> Result<Vec<AnswerEvent>, StoreError> {
            if self.fail {
                return Err(StoreError::Validation("backend offline".to_string()));
            }
            self.answer_reads.set(self.answer_reads.get() + 1);
            let mut answers = self.answers.clone();
            answers.sort_by(|a, b| b.answered_at.cmp(&a.answered_at));
            if let Some(limit) = limit {
                answers.truncate(limit);
            }
            Ok(answers)
        }
    }

    pub(crate) fn event(
        category: Category,
        difficulty: Difficulty,
        is_correct: bool,
        answered_at: DateTime<Utc>,
    ) -> AnswerEvent {
        AnswerEvent {
            answer_id: uuid::Uuid::new_v4().to_string(),
            quiz_id: uuid::Uuid::new_v4().to_string(),
            account_id: "alice".to_string(),
            merge_request_id: "github_acme_api_1".to_string(),
            category,
            difficulty,
            selected_answer_index: 0,
            is_correct,
            answered_at,
        }
    }

    /// Events for one category; `pattern[0]` is the newest.
    pub(crate) fn events(category: Category, pattern: &[bool]) -> Vec<AnswerEvent> {
        let now = Utc::now();
        pattern
            .iter()
            .enumerate()
            .map(|(age, &ok)| {
                event(category, Difficulty::Medium, ok, now - Duration::hours(age as i64))
            })
            .collect()
    }

    pub(crate) fn aggregate(
        category: Category,
        total: u64,
        correct: u64,
        weekly: f64,
        monthly: f64,
    ) -> SkillStats {
        SkillStats {
            stat_id: format!("stat-{category}"),
            account_id: "alice".to_string(),
            category,
            total_quizzes: total,
            correct_count: correct,
            correct_rate: if total > 0 { correct as f64 / total as f64 } else { 0.0 },
            average_difficulty: 2.0,
            last_answered_at: None,
            weekly_trend: weekly,
            monthly_trend: monthly,
            calculated_at: Utc::now(),
        }
    }

    #[test]
    fn aggregates_win_and_event_log_is_not_read() {
        let mut source = FakeSource::with_user("alice");
        source.stats = vec![aggregate(Category::Security, 3, 1, -0.3, 0.5)];
        source.answers = events(Category::Logic, &[true; 12]);

        let chosen = StatsSource::load(&source, "alice").unwrap();
        assert!(chosen.is_aggregated());
        assert_eq!(source.answer_reads.get(), 0);

        let figures = chosen.category_figures();
        assert_eq!(figures.len(), 1);
        assert_eq!(figures[0].trend, TrendLabel::Declining);
    }

    #[test]
    fn event_path_buckets_every_category() {
        let mut source = FakeSource::with_user("alice");
        source.answers = events(Category::Performance, &[true, false, true]);

        let chosen = StatsSource::load(&source, "alice").unwrap();
        assert!(!chosen.is_aggregated());

        let figures = chosen.category_figures();
        assert_eq!(figures.len(), Category::ALL.len());
        let perf = &figures[Category::Performance.index()];
        assert_eq!((perf.total, perf.correct), (3, 2));
        assert_eq!(perf.trend, TrendLabel::InsufficientData);
        assert!(perf.signals.is_none());
        assert_eq!(figures[Category::BugFix.index()].total, 0);
    }

    #[test]
    fn select_follows_load_policy() {
        let evs = events(Category::Logic, &[true]);
        assert!(!StatsSource::select(vec![], evs.clone()).is_aggregated());
        let agg = vec![aggregate(Category::Logic, 1, 1, 0.0, 0.0)];
        assert!(StatsSource::select(agg, evs).is_aggregated());
    }
}
