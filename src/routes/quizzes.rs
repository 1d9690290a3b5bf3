use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Router;

use crate::extractors::JsonBody;
use crate::response::{ok, AppError};
use crate::services::answer_recorder::{submit_answer, AnswerSubmission};
use crate::state::AppState;
use crate::tools::catalog::{query_quizzes, QuizQuery};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quizzes))
        .route("/:quiz_id/answer", post(answer_quiz))
}

async fn list_quizzes(
    State(state): State<AppState>,
    Query(query): Query<QuizQuery>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let limits = state.analytics();
    Ok(ok(query_quizzes(state.store(), query, &limits)?))
}

async fn answer_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<String>,
    JsonBody(submission): JsonBody<AnswerSubmission>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let outcome = submit_answer(state.store(), &quiz_id, &submission)?;
    Ok(ok(outcome))
}
