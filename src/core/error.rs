//! Typed error handling for the customers service
//!
//! Three kinds of domain failure (not-found, business-rule, duplicate) plus
//! field-level validation and a catch-all internal variant. Each variant
//! maps to exactly one HTTP status and a stable error code, so the
//! transport layer never has to interpret messages.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// The error type for all service operations.
#[derive(Debug, Error)]
pub enum CustomersError {
    /// A referenced owner identity does not exist.
    #[error("{message}")]
    NotFound { message: String },

    /// A semantic precondition failed (future birth date, pet cap,
    /// duplicate pet name). The message names the violated rule.
    #[error("{message}")]
    BusinessRule { message: String },

    /// A uniqueness constraint would be violated. Distinct from
    /// [`CustomersError::BusinessRule`] because it reflects conflict with
    /// other stored data, not a property of the request alone.
    #[error("{message}")]
    Duplicate { message: String },

    /// Field-level format errors, detected at the transport boundary
    /// before the rule layer runs.
    #[error("validation failed")]
    Validation { errors: Vec<FieldError> },

    /// Any unexpected failure (e.g. storage unavailability), propagated
    /// without rule-layer interpretation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A single field validation error.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable code for programmatic handling
    pub code: String,
    /// Human-readable message naming the violated rule
    pub message: String,
    /// When the error was raised
    pub timestamp: DateTime<Utc>,
    /// Per-field messages, present for validation errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl CustomersError {
    pub fn owner_not_found() -> Self {
        Self::NotFound {
            message: "owner not found".to_string(),
        }
    }

    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule {
            message: message.into(),
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BusinessRule { .. } => StatusCode::BAD_REQUEST,
            Self::Duplicate { .. } => StatusCode::CONFLICT,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::BusinessRule { .. } => "BUSINESS_RULE_VIOLATION",
            Self::Duplicate { .. } => "DUPLICATE_RESOURCE",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to the wire-level error body
    pub fn to_response(&self) -> ErrorResponse {
        let errors = match self {
            Self::Validation { errors } => Some(errors.clone()),
            _ => None,
        };
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            timestamp: Utc::now(),
            errors,
        }
    }
}

impl IntoResponse for CustomersError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<anyhow::Error> for CustomersError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CustomersError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter()
                    .map(move |e| FieldError {
                        field: field.clone(),
                        message: e
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string()),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        // HashMap iteration order is arbitrary
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self::Validation { errors: fields }
    }
}

/// A specialized Result type for service operations
pub type CustomersResult<T> = Result<T, CustomersError>;
