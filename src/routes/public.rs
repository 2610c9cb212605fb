use axum::{
    body::Body,
    extract::{Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::{error::AppError, state::AppState};

/// Everything outside `/api/` is a file under the static root. Only reads are
/// served; any other method is not-found.
pub async fn static_files(State(state): State<AppState>, request: Request) -> Response {
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return AppError::NotFound.into_response();
    }

    match ServeDir::new(&state.config.static_root)
        .oneshot(request)
        .await
    {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
