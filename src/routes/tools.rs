use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;

use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::tools::{dispatch, list_tools, ToolName};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/:name", post(invoke))
}

async fn list() -> impl axum::response::IntoResponse {
    ok(list_tools())
}

/// An empty body counts as an empty argument object.
async fn invoke(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let tool: ToolName = name
        .parse()
        .map_err(|msg: String| AppError::not_found(&msg))?;

    let args = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice::<Value>(&body).map_err(|e| {
            tracing::warn!(tool = %tool, error = %e, "Tool arguments are not valid JSON");
            AppError::bad_request("INVALID_REQUEST_BODY", "Invalid request body")
        })?
    };

    let analytics = state.analytics();
    let result = dispatch(state.store(), &analytics, tool, args)?;
    Ok(ok(result))
}
