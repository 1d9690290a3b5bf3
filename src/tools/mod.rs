//! Tool-style RPC surface: seven named tools taking a JSON argument object
//! and returning a JSON result.

pub mod catalog;
pub mod learner;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::analytics::history::{answers_history, HistoryFilter};
use crate::analytics::user_stats::report_user_stats;
use crate::analytics::weak_categories::analyze_weak_categories;
use crate::analytics::AnalyticsError;
use crate::config::AnalyticsConfig;
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    QueryQuizzes,
    GetUserStats,
    AnalyzeWeakCategories,
    GetAnswersHistory,
    SearchMergeRequests,
    GetUserProfile,
    GetGrowthMilestones,
}

impl ToolName {
    pub const ALL: &'static [ToolName] = &[
        ToolName::QueryQuizzes,
        ToolName::GetUserStats,
        ToolName::AnalyzeWeakCategories,
        ToolName::GetAnswersHistory,
        ToolName::SearchMergeRequests,
        ToolName::GetUserProfile,
        ToolName::GetGrowthMilestones,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::QueryQuizzes => "query_quizzes",
            ToolName::GetUserStats => "get_user_stats",
            ToolName::AnalyzeWeakCategories => "analyze_weak_categories",
            ToolName::GetAnswersHistory => "get_answers_history",
            ToolName::SearchMergeRequests => "search_merge_requests",
            ToolName::GetUserProfile => "get_user_profile",
            ToolName::GetGrowthMilestones => "get_growth_milestones",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolName::QueryQuizzes => "Search quizzes by category, difficulty, status, user, or merge request. Returns quiz data including questions, options, and explanations.",
            ToolName::GetUserStats => "Get comprehensive statistics for a user including total quizzes, accuracy rates, and breakdowns by category and difficulty.",
            ToolName::AnalyzeWeakCategories => "Analyze a user's weak categories based on their answer history. Identifies areas needing improvement and provides recommendations.",
            ToolName::GetAnswersHistory => "Get a user's answer history with optional filters for category, difficulty, and correctness. Useful for detailed learning analysis.",
            ToolName::SearchMergeRequests => "Search merge requests (PRs/MRs) by platform, repository, author, or status. Returns MR metadata including titles and file changes.",
            ToolName::GetUserProfile => "Get a user's profile including career goals, experience level, focus areas, and self-assessment.",
            ToolName::GetGrowthMilestones => "Get a user's growth milestones including achievements like first correct answer, category mastery, and streak records.",
        }
    }

    /// JSON schema of the argument object.
    pub fn input_schema(self) -> Value {
        let account = json!({ "type": "string", "minLength": 1, "description": "User account ID (GitHub/GitLab username)" });
        let limit = json!({ "type": "integer", "minimum": 1, "maximum": 100, "description": "Maximum number of results (default: 50, max: 100)" });
        let category = json!({ "type": "string", "enum": ["bug_fix", "performance", "refactoring", "security", "logic"] });
        let difficulty = json!({ "type": "string", "enum": ["easy", "medium", "hard"] });

        match self {
            ToolName::QueryQuizzes => json!({
                "type": "object",
                "properties": {
                    "category": category,
                    "difficulty": difficulty,
                    "status": { "type": "string", "enum": ["pending", "answered", "skipped", "expired"] },
                    "accountId": { "type": "string" },
                    "mergeRequestId": { "type": "string" },
                    "limit": limit,
                }
            }),
            ToolName::GetUserStats | ToolName::GetUserProfile => json!({
                "type": "object",
                "properties": { "accountId": account },
                "required": ["accountId"]
            }),
            ToolName::AnalyzeWeakCategories => json!({
                "type": "object",
                "properties": {
                    "accountId": account,
                    "minAnswers": { "type": "integer", "minimum": 1, "description": "Minimum answers per category to include in analysis (default: 3)" },
                },
                "required": ["accountId"]
            }),
            ToolName::GetAnswersHistory => json!({
                "type": "object",
                "properties": {
                    "accountId": account,
                    "limit": limit,
                    "category": category,
                    "difficulty": difficulty,
                    "correctOnly": { "type": "boolean" },
                    "incorrectOnly": { "type": "boolean" },
                },
                "required": ["accountId"]
            }),
            ToolName::SearchMergeRequests => json!({
                "type": "object",
                "properties": {
                    "platform": { "type": "string", "enum": ["github", "gitlab"] },
                    "owner": { "type": "string" },
                    "repo": { "type": "string" },
                    "authorAccountId": { "type": "string" },
                    "status": { "type": "string", "enum": ["open", "merged", "closed"] },
                    "limit": limit,
                }
            }),
            ToolName::GetGrowthMilestones => json!({
                "type": "object",
                "properties": { "accountId": account, "limit": limit },
                "required": ["accountId"]
            }),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .iter()
            .copied()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| format!("unknown tool: {s}"))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub fn list_tools() -> Vec<ToolInfo> {
    ToolName::ALL
        .iter()
        .map(|&tool| ToolInfo {
            name: tool.as_str(),
            description: tool.description(),
            input_schema: tool.input_schema(),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountArgs {
    account_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeakCategoryArgs {
    account_id: String,
    min_answers: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryArgs {
    account_id: String,
    #[serde(flatten)]
    filter: HistoryFilter,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MilestoneArgs {
    account_id: String,
    limit: Option<usize>,
}

fn parse_args<T: DeserializeOwned>(tool: ToolName, args: Value) -> Result<T, AnalyticsError> {
    let args = if args.is_null() { json!({}) } else { args };
    serde_json::from_value(args)
        .map_err(|e| AnalyticsError::InvalidInput(format!("invalid arguments for {tool}: {e}")))
}

fn to_json<T: Serialize>(value: T) -> Result<Value, AnalyticsError> {
    Ok(serde_json::to_value(value)?)
}

/// Runs one tool. Argument errors become [`AnalyticsError::InvalidInput`].
pub fn dispatch(
    store: &Store,
    limits: &AnalyticsConfig,
    tool: ToolName,
    args: Value,
) -> Result<Value, AnalyticsError> {
    match tool {
        ToolName::QueryQuizzes => {
            to_json(catalog::query_quizzes(store, parse_args(tool, args)?, limits)?)
        }
        ToolName::GetUserStats => {
            let AccountArgs { account_id } = parse_args(tool, args)?;
            to_json(report_user_stats(store, &account_id, limits.stats_window)?)
        }
        ToolName::AnalyzeWeakCategories => {
            let WeakCategoryArgs { account_id, min_answers } = parse_args(tool, args)?;
            to_json(analyze_weak_categories(store, &account_id, min_answers)?)
        }
        ToolName::GetAnswersHistory => {
            let HistoryArgs { account_id, filter } = parse_args(tool, args)?;
            to_json(answers_history(
                store,
                &account_id,
                &filter,
                limits.history_default_limit,
                limits.max_limit,
            )?)
        }
        ToolName::SearchMergeRequests => {
            to_json(catalog::search_merge_requests(store, parse_args(tool, args)?, limits)?)
        }
        ToolName::GetUserProfile => {
            let AccountArgs { account_id } = parse_args(tool, args)?;
            to_json(learner::user_profile(store, &account_id)?)
        }
        ToolName::GetGrowthMilestones => {
            let MilestoneArgs { account_id, limit } = parse_args(tool, args)?;
            to_json(learner::growth_milestones(store, &account_id, limit, limits)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        (dir, store)
    }

    #[test]
    fn unrenderable_output_is_a_serialization_error() {
        let keyed_by_list = std::collections::BTreeMap::from([(vec![1_u8], 1_u8)]);
        let err = to_json(keyed_by_list).unwrap_err();
        assert!(matches!(err, AnalyticsError::Serialization(_)));
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for tool in ToolName::ALL {
            assert_eq!(tool.as_str().parse::<ToolName>(), Ok(*tool));
        }
        assert!("drop_tables".parse::<ToolName>().is_err());
    }

    #[test]
    fn lists_seven_tools() {
        let tools = list_tools();
        assert_eq!(tools.len(), 7);
        assert_eq!(tools[2].name, "analyze_weak_categories");
        assert_eq!(tools[2].input_schema["required"][0], "accountId");
    }

    #[test]
    fn wrong_argument_types_are_invalid_input() {
        let (_dir, store) = store();
        let limits = AnalyticsConfig::default();

        for args in [
            json!({ "accountId": "alice", "minAnswers": -1 }),
            json!({ "accountId": "alice", "minAnswers": 2.5 }),
            json!({ "minAnswers": 3 }),
        ] {
            let result = dispatch(&store, &limits, ToolName::AnalyzeWeakCategories, args);
            assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
        }
    }

    #[test]
    fn unknown_user_is_a_value_not_an_error() {
        let (_dir, store) = store();
        let out = dispatch(
            &store,
            &AnalyticsConfig::default(),
            ToolName::GetUserStats,
            json!({ "accountId": "ghost" }),
        )
        .unwrap();
        assert_eq!(out["found"], false);
    }

    #[test]
    fn null_arguments_work_for_filter_only_tools() {
        let (_dir, store) = store();
        let out = dispatch(
            &store,
            &AnalyticsConfig::default(),
            ToolName::SearchMergeRequests,
            Value::Null,
        )
        .unwrap();
        assert_eq!(out["count"], 0);
        assert_eq!(out["repositorySummary"], json!([]));
    }
}
