use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

pub const MISSING_FIELDS: &str = "Missing required fields: name, data, savedAt";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("server error: stored data is not valid JSON: {0}")]
    CorruptData(#[source] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid API endpoint: {0}")]
    UnknownCollection(String),
    #[error("not found")]
    NotFound,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::CorruptData(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidJson(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownCollection(_) | AppError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {self}");
        }

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            AppError::BadRequest(MISSING_FIELDS.into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnknownCollection("users".into()).status(),
            StatusCode::NOT_FOUND
        );
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            AppError::InvalidJson(parse_err).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_errors_surface_their_message() {
        let err = AppError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("server error: "));
    }

    #[test]
    fn unknown_collection_names_the_endpoint() {
        let err = AppError::UnknownCollection("users".into());
        assert_eq!(err.to_string(), "Invalid API endpoint: users");
    }
}
