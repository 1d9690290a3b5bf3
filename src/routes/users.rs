use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::analytics::history::{answers_history, HistoryFilter};
use crate::analytics::user_stats::report_user_stats;
use crate::analytics::weak_categories::analyze_weak_categories;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::tools::learner;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:account_id/stats", get(get_stats))
        .route("/:account_id/weak-categories", get(get_weak_categories))
        .route("/:account_id/answers", get(get_answers))
        .route("/:account_id/profile", get(get_profile))
        .route("/:account_id/milestones", get(get_milestones))
}

async fn get_stats(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let window = state.analytics().stats_window;
    Ok(ok(report_user_stats(state.store(), &account_id, window)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeakCategoryQuery {
    min_answers: Option<u32>,
}

async fn get_weak_categories(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(query): Query<WeakCategoryQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    Ok(ok(analyze_weak_categories(
        state.store(),
        &account_id,
        query.min_answers,
    )?))
}

async fn get_answers(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(filter): Query<HistoryFilter>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limits = state.analytics();
    Ok(ok(answers_history(
        state.store(),
        &account_id,
        &filter,
        limits.history_default_limit,
        limits.max_limit,
    )?))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    Ok(ok(learner::user_profile(state.store(), &account_id)?))
}

#[derive(Debug, Deserialize)]
struct LimitQuery {
    limit: Option<usize>,
}

async fn get_milestones(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limits = state.analytics();
    Ok(ok(learner::growth_milestones(
        state.store(),
        &account_id,
        query.limit,
        &limits,
    )?))
}
