use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::invoice::{InvoiceError, ValidationErrors};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Aggregated validation failures (400 Bad Request)
  Validation(ValidationErrors),

  /// Referenced record does not exist (404 Not Found)
  NotFound(String),

  /// Unique constraint conflict (409 Conflict)
  Conflict(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(errors) => write!(f, "Validation error: {}", errors),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message, details) = match self {
      ApiError::Validation(errors) => (
        "validation_error",
        errors.to_string(),
        serde_json::to_value(&errors.violations).ok(),
      ),
      ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
      ApiError::Conflict(msg) => ("conflict", msg.clone(), None),
      ApiError::Internal(msg) => {
        // Don't expose internal error details to the caller
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
          None,
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::Validation(errors) => ApiError::Validation(errors),
      InvoiceError::CustomerNotFound(id) => {
        ApiError::NotFound(format!("Customer {} not found", id))
      }
      InvoiceError::InvoiceNotFound(id) => ApiError::NotFound(format!("Invoice {} not found", id)),
      InvoiceError::CustomerNameConflict(name) => {
        ApiError::Conflict(format!("Customer '{}' already exists", name))
      }
      InvoiceError::InvoiceNumberConflict(number) => {
        ApiError::Conflict(format!("Invoice number '{}' already exists", number))
      }
      InvoiceError::PdfRenderFailed(msg) => {
        ApiError::Internal(format!("PDF rendering failed: {}", msg))
      }
      InvoiceError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
    }
  }
}

/// Convert validation errors from the validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut collected = ValidationErrors::new();
    for (field, field_errors) in errors.field_errors() {
      for error in field_errors.iter() {
        let message = error
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| format!("Invalid field: {}", field));
        collected.push_field(field.as_ref(), message);
      }
    }
    ApiError::Validation(collected)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use uuid::Uuid;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation(ValidationErrors::new()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::NotFound("missing".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Conflict("duplicate".to_string()).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Internal("broken".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_domain_error_conversion() {
    let api_error: ApiError = InvoiceError::InvoiceNotFound(Uuid::new_v4()).into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError = InvoiceError::CustomerNameConflict("Acme".to_string()).into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let mut errors = ValidationErrors::new();
    errors.push_row(0, "description", "Description cannot be empty");
    let api_error: ApiError = InvoiceError::Validation(errors).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);
  }
}
