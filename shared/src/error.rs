use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("validation failed: {0}")]
    ValidationError(#[from] garde::Report),
    #[error("failed to convert a stored record: {0}")]
    ConversionEntityError(String),
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("failed to open or commit a transaction")]
    TransactionError(#[source] sqlx::Error),
    #[error("database query failed")]
    DbQueryError(#[source] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ConversionEntityError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::TransactionError(_)
            | AppError::DbQueryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code.is_server_error() {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "unexpected error happened"
            );
        }

        (status_code, self.to_string()).into_response()
    }
}
