use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;

use crate::{
    error::AppError,
    models::record::{Collection, Created, NewRecord, Record},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/:collection",
        get(list_records)
            .post(create_record)
            .fallback(unsupported_method),
    )
}

async fn list_records(
    State(state): State<AppState>,
    collection: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Record>>, AppError> {
    let collection = parse_collection(collection)?;
    let records = state.store.list(collection).await?;
    Ok(Json(records))
}

// The body is taken raw so that a missing or wrong Content-Type still gets
// parsed as JSON.
async fn create_record(
    State(state): State<AppState>,
    collection: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<(StatusCode, Json<Created>), AppError> {
    let collection = parse_collection(collection)?;
    let record = NewRecord::from_json(&body)?;
    let id = state.store.insert(collection, &record).await?;
    info!("saved {collection} #{id} ({})", record.name);
    Ok((StatusCode::CREATED, Json(Created::new(id))))
}

// A segment that does not even decode is just another unknown endpoint.
fn parse_collection(path: Result<Path<String>, PathRejection>) -> Result<Collection, AppError> {
    match path {
        Ok(Path(name)) => name.parse(),
        Err(rejection) => Err(AppError::UnknownCollection(rejection.body_text())),
    }
}

async fn unsupported_method() -> AppError {
    AppError::NotFound
}
