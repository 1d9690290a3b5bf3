use serde::{Deserialize, Serialize};

use crate::analytics::taxonomy::{Category, Difficulty, MergeRequestStatus, Platform, QuizStatus};
use crate::analytics::AnalyticsError;
use crate::config::AnalyticsConfig;
use crate::store::operations::merge_requests::{MergeRequest, MergeRequestFilter};
use crate::store::operations::quizzes::{Quiz, QuizFilter};
use crate::store::Store;
use crate::validation::resolve_limit;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuery {
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<QuizStatus>,
    pub account_id: Option<String>,
    pub merge_request_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQueryResult {
    pub count: usize,
    pub quizzes: Vec<Quiz>,
}

pub fn query_quizzes(
    store: &Store,
    query: QuizQuery,
    limits: &AnalyticsConfig,
) -> Result<QuizQueryResult, AnalyticsError> {
    let limit = resolve_limit(query.limit, limits.history_default_limit, limits.max_limit)
        .map_err(AnalyticsError::InvalidInput)?;
    tracing::info!(?query, "Executing query_quizzes");

    let quizzes = store.query_quizzes(&QuizFilter {
        category: query.category,
        difficulty: query.difficulty,
        status: query.status,
        account_id: query.account_id,
        merge_request_id: query.merge_request_id,
        limit: Some(limit),
    })?;

    tracing::info!(count = quizzes.len(), "query_quizzes completed");
    Ok(QuizQueryResult {
        count: quizzes.len(),
        quizzes,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequestSearch {
    pub platform: Option<Platform>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub author_account_id: Option<String>,
    pub status: Option<MergeRequestStatus>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryCount {
    pub repository: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequestSearchResult {
    pub count: usize,
    /// In order of first appearance in `merge_requests`.
    pub repository_summary: Vec<RepositoryCount>,
    pub merge_requests: Vec<MergeRequest>,
}

pub fn search_merge_requests(
    store: &Store,
    search: MergeRequestSearch,
    limits: &AnalyticsConfig,
) -> Result<MergeRequestSearchResult, AnalyticsError> {
    let limit = resolve_limit(search.limit, limits.history_default_limit, limits.max_limit)
        .map_err(AnalyticsError::InvalidInput)?;
    tracing::info!(?search, "Executing search_merge_requests");

    let merge_requests = store.query_merge_requests(&MergeRequestFilter {
        platform: search.platform,
        owner: search.owner,
        repo: search.repo,
        author_account_id: search.author_account_id,
        status: search.status,
        limit: Some(limit),
    })?;

    let mut repository_summary: Vec<RepositoryCount> = Vec::new();
    for mr in &merge_requests {
        let repository = mr.repository();
        match repository_summary.iter_mut().find(|r| r.repository == repository) {
            Some(entry) => entry.count += 1,
            None => repository_summary.push(RepositoryCount {
                repository,
                count: 1,
            }),
        }
    }

    tracing::info!(count = merge_requests.len(), "search_merge_requests completed");
    Ok(MergeRequestSearchResult {
        count: merge_requests.len(),
        repository_summary,
        merge_requests,
    })
}
