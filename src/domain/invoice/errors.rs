use serde::Serialize;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::value_objects::ValueObjectError;

/// One rejected field. `row` is set for line-item rows (0-based submission
/// index), absent for header fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
  pub row: Option<usize>,
  pub field: String,
  pub message: String,
}

/// Aggregated field- and row-level failures for one submission. All checks
/// run before any write, so the caller can correct everything in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
  pub violations: Vec<Violation>,
}

impl ValidationErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push_field(&mut self, field: &str, message: impl Into<String>) {
    self.violations.push(Violation {
      row: None,
      field: field.to_string(),
      message: message.into(),
    });
  }

  pub fn push_row(&mut self, row: usize, field: &str, message: impl Into<String>) {
    self.violations.push(Violation {
      row: Some(row),
      field: field.to_string(),
      message: message.into(),
    });
  }

  pub fn is_empty(&self) -> bool {
    self.violations.is_empty()
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self
      .violations
      .iter()
      .map(|v| match v.row {
        Some(row) => format!("item {}: {}: {}", row + 1, v.field, v.message),
        None => format!("{}: {}", v.field, v.message),
      })
      .collect();
    write!(f, "{}", parts.join("; "))
  }
}

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("Customer not found: {0}")]
  CustomerNotFound(Uuid),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("Customer '{0}' already exists")]
  CustomerNameConflict(String),

  #[error("Invoice number '{0}' already exists")]
  InvoiceNumberConflict(String),

  #[error("PDF rendering failed: {0}")]
  PdfRenderFailed(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl From<ValueObjectError> for InvoiceError {
  fn from(error: ValueObjectError) -> Self {
    let mut errors = ValidationErrors::new();
    errors.push_field("value", error.to_string());
    InvoiceError::Validation(errors)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validation_errors_collects_all() {
    let mut errors = ValidationErrors::new();
    assert!(errors.is_empty());

    errors.push_field("customer", "select a customer or enter a new name");
    errors.push_row(1, "description", "Description cannot be empty");
    errors.push_row(2, "quantity", "Amount cannot have more than 2 decimal places");

    assert_eq!(errors.violations.len(), 3);
    assert_eq!(errors.violations[0].row, None);
    assert_eq!(errors.violations[1].row, Some(1));
  }

  #[test]
  fn test_validation_errors_display() {
    let mut errors = ValidationErrors::new();
    errors.push_field("status", "Unknown status: archived");
    errors.push_row(0, "description", "Description cannot be empty");

    let rendered = errors.to_string();
    assert!(rendered.contains("status: Unknown status: archived"));
    assert!(rendered.contains("item 1: description"));
  }
}
