//! Error types for the holdings search server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use holdings_models::ErrorBody;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Database(_) | Error::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<holdings_models::Error> for Error {
    fn from(e: holdings_models::Error) -> Self {
        Error::Validation(e.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
                format!("{field} ({})", codes.join(", "))
            })
            .collect();
        // Flattened filter errors are reported under their own field names.
        for (_, kind) in errors.errors() {
            if let validator::ValidationErrorsKind::Struct(nested) = kind {
                for (field, errs) in nested.field_errors() {
                    let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
                    fields.push(format!("{field} ({})", codes.join(", ")));
                }
            }
        }
        fields.sort();
        Error::Validation(format!("invalid fields: {}", fields.join("; ")))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Error::Validation(_) | Error::Unavailable(_) => self.to_string(),
            Error::Database(_) | Error::Other(_) => {
                // Store details stay in the logs.
                tracing::error!(error = %self, "Internal error");
                "Internal server error".to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
