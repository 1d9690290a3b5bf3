use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analytics::projection::{SkillDataSource, StatsSource};
use crate::analytics::taxonomy::{Difficulty, Platform};
use crate::analytics::{accuracy_percent, require_account_id, AnalyticsError, Lookup, NotFound};
use crate::store::operations::answers::AnswerEvent;
use crate::store::operations::users::User;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub name: String,
    pub total: u64,
    pub correct: u64,
    pub accuracy_rate: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_trend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_trend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_difficulty: Option<f64>,
}

impl BreakdownEntry {
    fn counts(name: &str, total: u64, correct: u64) -> Self {
        Self {
            name: name.to_string(),
            total,
            correct,
            accuracy_rate: accuracy_percent(correct, total),
            weekly_trend: None,
            monthly_trend: None,
            average_difficulty: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub account_id: String,
    pub platform: Platform,
    pub total_quizzes: u64,
    pub correct_count: u64,
    pub overall_accuracy_rate: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            account_id: user.account_id.clone(),
            platform: user.platform,
            total_quizzes: user.total_quizzes,
            correct_count: user.correct_count,
            overall_accuracy_rate: accuracy_percent(user.correct_count, user.total_quizzes),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsReport {
    pub found: bool,
    pub user: UserSummary,
    pub category_breakdown: Vec<BreakdownEntry>,
    pub difficulty_breakdown: Vec<BreakdownEntry>,
    pub recent_answers_count: usize,
    pub skill_stats_available: bool,
}

/// Dashboard view of an account: lifetime accuracy plus category and
/// difficulty breakdowns.
///
/// The difficulty breakdown always comes from the `window` most recent
/// answers. The category breakdown prefers the aggregate projection and
/// otherwise falls back to the same answer window.
pub fn report_user_stats<S: SkillDataSource + ?Sized>(
    source: &S,
    account_id: &str,
    window: usize,
) -> Result<Lookup<UserStatsReport>, AnalyticsError> {
    require_account_id(account_id)?;
    tracing::info!(account_id, "Executing get_user_stats");

    let Some(user) = source.find_user(account_id)? else {
        return Ok(Lookup::NotFound(NotFound::user(account_id)));
    };

    let recent = source.answers_for(account_id, Some(window))?;
    let aggregates = source.skill_stats_for(account_id)?;

    let difficulty_breakdown = difficulty_breakdown(&recent);
    let recent_answers_count = recent.len();
    let stats = StatsSource::select(aggregates, recent);

    let report = UserStatsReport {
        found: true,
        user: UserSummary::from(&user),
        category_breakdown: category_breakdown(&stats),
        difficulty_breakdown,
        recent_answers_count,
        skill_stats_available: stats.is_aggregated(),
    };

    tracing::info!(account_id, "get_user_stats completed");
    Ok(Lookup::Found(report))
}

/// Aggregates expose their trend signals. Recomputed figures list only the
/// categories that occur in the window.
pub fn category_breakdown(stats: &StatsSource) -> Vec<BreakdownEntry> {
    let aggregated = stats.is_aggregated();
    stats
        .category_figures()
        .into_iter()
        .filter(|figures| aggregated || figures.total > 0)
        .map(|figures| {
            let mut entry =
                BreakdownEntry::counts(figures.category.as_str(), figures.total, figures.correct);
            if let Some(signals) = figures.signals {
                entry.weekly_trend = Some(signals.weekly_trend);
                entry.monthly_trend = Some(signals.monthly_trend);
                entry.average_difficulty = Some(signals.average_difficulty);
            }
            entry
        })
        .collect()
}

pub fn difficulty_breakdown(events: &[AnswerEvent]) -> Vec<BreakdownEntry> {
    Difficulty::ALL
        .iter()
        .filter_map(|&difficulty| {
            let (total, correct) = events
                .iter()
                .filter(|e| e.difficulty == difficulty)
                .fold((0u64, 0u64), |(total, correct), e| {
                    (total + 1, correct + u64::from(e.is_correct))
                });
            (total > 0).then(|| BreakdownEntry::counts(difficulty.as_str(), total, correct))
        })
        .collect()
}
