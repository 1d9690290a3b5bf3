use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError};

use crate::analytics::taxonomy::Category;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// Precomputed per-category aggregate for one account.
///
/// Produced by the aggregation collaborator on every new answer; the
/// analytics engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStats {
    pub stat_id: String,
    pub account_id: String,
    pub category: Category,
    pub total_quizzes: u64,
    pub correct_count: u64,
    pub correct_rate: f64,
    pub average_difficulty: f64,
    pub last_answered_at: Option<DateTime<Utc>>,
    pub weekly_trend: f64,
    pub monthly_trend: f64,
    pub calculated_at: DateTime<Utc>,
}

/// Figures supplied by the aggregator; identity and derived fields are filled in on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStatsFigures {
    pub total_quizzes: u64,
    pub correct_count: u64,
    pub average_difficulty: f64,
    #[serde(default)]
    pub last_answered_at: Option<DateTime<Utc>>,
    pub weekly_trend: f64,
    pub monthly_trend: f64,
}

fn validate_figures(figures: &SkillStatsFigures) -> Result<(), StoreError> {
    if figures.correct_count > figures.total_quizzes {
        return Err(StoreError::Validation(format!(
            "correctCount {} exceeds totalQuizzes {}",
            figures.correct_count, figures.total_quizzes
        )));
    }
    for (name, value) in [
        ("weeklyTrend", figures.weekly_trend),
        ("monthlyTrend", figures.monthly_trend),
        ("averageDifficulty", figures.average_difficulty),
    ] {
        if !value.is_finite() {
            return Err(StoreError::Validation(format!("{name} must be finite")));
        }
    }
    if !(0.0..=3.0).contains(&figures.average_difficulty) {
        return Err(StoreError::Validation(format!(
            "averageDifficulty {} is outside 0..=3",
            figures.average_difficulty
        )));
    }
    Ok(())
}

impl Store {
    /// All aggregates of an account, in canonical category order.
    pub fn get_skill_stats_by_user(&self, account_id: &str) -> Result<Vec<SkillStats>, StoreError> {
        let prefix = keys::skill_stats_prefix(account_id)?;
        let mut stats: Vec<SkillStats> = Self::scan_docs(&self.skill_stats, &prefix, None)?;
        stats.sort_by_key(|s| s.category);
        Ok(stats)
    }

    pub fn get_skill_stats(
        &self,
        account_id: &str,
        category: Category,
    ) -> Result<Option<SkillStats>, StoreError> {
        let key = keys::skill_stats_key(account_id, category)?;
        match self.skill_stats.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Creates or replaces the aggregate for `(account_id, category)`.
    ///
    /// Counts may only grow: a write that lowers `totalQuizzes` or
    /// `correctCount` below the stored record is rejected.
    pub fn put_skill_stats(
        &self,
        account_id: &str,
        category: Category,
        figures: &SkillStatsFigures,
    ) -> Result<SkillStats, StoreError> {
        validate_figures(figures)?;
        let key = keys::skill_stats_key(account_id, category)?;
        let correct_rate = if figures.total_quizzes > 0 {
            figures.correct_count as f64 / figures.total_quizzes as f64
        } else {
            0.0
        };

        self.skill_stats
            .transaction(|tx| {
                let previous: Option<SkillStats> = match tx.get(key.as_bytes())? {
                    Some(raw) => Some(
                        Self::deserialize(&raw).map_err(ConflictableTransactionError::Abort)?,
                    ),
                    None => None,
                };

                if let Some(prev) = &previous {
                    if figures.total_quizzes < prev.total_quizzes
                        || figures.correct_count < prev.correct_count
                    {
                        return Err(ConflictableTransactionError::Abort(
                            StoreError::Validation(format!(
                                "skill stats for {account_id}/{category} cannot decrease \
                                 ({}/{} -> {}/{})",
                                prev.correct_count,
                                prev.total_quizzes,
                                figures.correct_count,
                                figures.total_quizzes
                            )),
                        ));
                    }
                }

                let stats = SkillStats {
                    stat_id: previous
                        .as_ref()
                        .map(|p| p.stat_id.clone())
                        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    account_id: account_id.to_string(),
                    category,
                    total_quizzes: figures.total_quizzes,
                    correct_count: figures.correct_count,
                    correct_rate,
                    average_difficulty: figures.average_difficulty,
                    last_answered_at: figures.last_answered_at,
                    weekly_trend: figures.weekly_trend,
                    monthly_trend: figures.monthly_trend,
                    calculated_at: Utc::now(),
                };
                let bytes = Self::serialize(&stats).map_err(ConflictableTransactionError::Abort)?;
                tx.insert(key.as_bytes(), bytes)?;
                Ok(stats)
            })
            .map_err(|error: TransactionError<StoreError>| match error {
                TransactionError::Abort(store_error) => store_error,
                TransactionError::Storage(storage_error) => StoreError::Sled(storage_error),
            })
    }

    pub fn delete_skill_stats_for_account(&self, account_id: &str) -> Result<usize, StoreError> {
        Self::remove_prefix(&self.skill_stats, &keys::skill_stats_prefix(account_id)?)
    }
}
