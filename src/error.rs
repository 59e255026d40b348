use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::dates::DateKey;

/// Per-field validation messages, keyed by request field name.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, errors: FieldErrors },

    #[error("No meals found for the specified date")]
    NoMealsForDate(DateKey),

    #[error("Food item not found")]
    FoodNotFound(i64),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(errors: FieldErrors) -> Self {
        let mut messages = errors.values().flatten();
        let first = messages
            .next()
            .cloned()
            .unwrap_or_else(|| "The given data was invalid.".into());
        let rest = messages.count();
        let message = match rest {
            0 => first,
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        };
        AppError::Validation { message, errors }
    }

    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field, vec![message.into()]);
        Self::validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            AppError::Validation { errors, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": message, "errors": errors })),
            )
                .into_response(),
            AppError::NoMealsForDate(date) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": message, "date": date })),
            )
                .into_response(),
            AppError::FoodNotFound(_) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            AppError::Internal(e) => {
                error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
