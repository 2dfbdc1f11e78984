use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::templates::NotFoundTemplate;

#[derive(Debug, ThisError)]
pub enum QaError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Template error: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,

    #[error("Login required")]
    Unauthenticated,

    #[error("Insufficient role")]
    Forbidden,
}

impl QaError {
    /// True when the store rejected a write because of a UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, QaError::DatabaseError(SqlxError::Database(db)) if db.is_unique_violation())
    }
}

impl IntoResponse for QaError {
    fn into_response(self) -> axum::response::Response {
        match self {
            QaError::Unauthenticated => Redirect::to("/login").into_response(),
            QaError::Forbidden => Redirect::to("/").into_response(),
            QaError::NotFound => {
                let body = NotFoundTemplate
                    .render()
                    .unwrap_or_else(|_| "Not Found".to_string());
                (StatusCode::NOT_FOUND, Html(body)).into_response()
            }
            QaError::DatabaseError(_)
            | QaError::PasswordHash(_)
            | QaError::TemplateError(_)
            | QaError::Config(_) => {
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("<h1>Internal Server Error</h1>".to_string()),
                )
                    .into_response()
            }
        }
    }
}
