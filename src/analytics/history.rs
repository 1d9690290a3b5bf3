use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::projection::SkillDataSource;
use crate::analytics::taxonomy::{Category, Difficulty};
use crate::analytics::{accuracy_percent, require_account_id, AnalyticsError, Lookup, NotFound};
use crate::store::operations::answers::AnswerEvent;
use crate::validation::resolve_limit;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    pub limit: Option<usize>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub correct_only: bool,
    #[serde(default)]
    pub incorrect_only: bool,
}

impl HistoryFilter {
    fn matches(&self, event: &AnswerEvent) -> bool {
        if self.category.is_some_and(|c| c != event.category) {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != event.difficulty) {
            return false;
        }
        if self.correct_only {
            event.is_correct
        } else if self.incorrect_only {
            !event.is_correct
        } else {
            true
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub correct: usize,
    pub incorrect: usize,
    pub accuracy_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub answer_id: String,
    pub quiz_id: String,
    pub merge_request_id: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub selected_answer_index: u8,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl From<AnswerEvent> for HistoryEntry {
    fn from(event: AnswerEvent) -> Self {
        Self {
            answer_id: event.answer_id,
            quiz_id: event.quiz_id,
            merge_request_id: event.merge_request_id,
            category: event.category,
            difficulty: event.difficulty,
            selected_answer_index: event.selected_answer_index,
            is_correct: event.is_correct,
            answered_at: event.answered_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswersHistory {
    pub found: bool,
    pub account_id: String,
    pub total_returned: usize,
    /// Matching answers before the limit was applied.
    pub total_in_database: usize,
    /// Over the returned answers only.
    pub summary: HistorySummary,
    pub answers: Vec<HistoryEntry>,
}

/// Newest-first answer log of an account. `correctOnly` wins when both
/// correctness filters are set.
pub fn answers_history<S: SkillDataSource + ?Sized>(
    source: &S,
    account_id: &str,
    filter: &HistoryFilter,
    default_limit: usize,
    max_limit: usize,
) -> Result<Lookup<AnswersHistory>, AnalyticsError> {
    require_account_id(account_id)?;
    let limit =
        resolve_limit(filter.limit, default_limit, max_limit).map_err(AnalyticsError::InvalidInput)?;

    tracing::info!(account_id, "Executing get_answers_history");

    if source.find_user(account_id)?.is_none() {
        return Ok(Lookup::NotFound(NotFound::user(account_id)));
    }

    let matching: Vec<AnswerEvent> = source
        .answers_for(account_id, None)?
        .into_iter()
        .filter(|event| filter.matches(event))
        .collect();
    let total_in_database = matching.len();

    let answers: Vec<HistoryEntry> = matching
        .into_iter()
        .take(limit)
        .map(HistoryEntry::from)
        .collect();
    let correct = answers.iter().filter(|a| a.is_correct).count();
    let incorrect = answers.len() - correct;

    tracing::info!(account_id, count = answers.len(), "get_answers_history completed");

    Ok(Lookup::Found(AnswersHistory {
        found: true,
        account_id: account_id.to_string(),
        total_returned: answers.len(),
        total_in_database,
        summary: HistorySummary {
            correct,
            incorrect,
            accuracy_rate: accuracy_percent(correct as u64, answers.len() as u64),
        },
        answers,
    }))
}
