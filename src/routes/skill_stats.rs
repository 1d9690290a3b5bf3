use axum::extract::{Path, State};
use axum::routing::put;
use axum::Router;

use crate::analytics::taxonomy::{Category, ParseTaxonomyError};
use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::operations::skill_stats::SkillStatsFigures;
use crate::validation::validate_account_id;

pub fn router() -> Router<AppState> {
    Router::new().route("/:account_id/:category", put(put_skill_stats))
}

/// Write boundary for the aggregation job. Counts may only grow.
async fn put_skill_stats(
    State(state): State<AppState>,
    Path((account_id, category)): Path<(String, String)>,
    JsonBody(figures): JsonBody<SkillStatsFigures>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    validate_account_id(&account_id).map_err(AppError::validation)?;
    let category: Category = category
        .parse()
        .map_err(|e: ParseTaxonomyError| AppError::validation(&e.to_string()))?;

    let stats = state.store().put_skill_stats(&account_id, category, &figures)?;
    tracing::info!(
        account_id = %account_id,
        %category,
        total = stats.total_quizzes,
        "Skill stats updated"
    );
    Ok(ok(stats))
}
