use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid customer name: {0}")]
  InvalidCustomerName(String),
  #[error("Invalid invoice number: {0}")]
  InvalidInvoiceNumber(String),
  #[error("Invalid status: {0}")]
  InvalidStatus(String),
  #[error("Invalid description: {0}")]
  InvalidDescription(String),
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),
}

// Customer Name - unique across all customers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerName(String);

impl CustomerName {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidCustomerName(
        "Customer name cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 200 {
      return Err(ValueObjectError::InvalidCustomerName(
        "Customer name cannot exceed 200 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for CustomerName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Number - opaque unique token, generated when the caller supplies none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Invoice number cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 50 {
      return Err(ValueObjectError::InvalidInvoiceNumber(
        "Invoice number cannot exceed 50 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  /// Generates an `INV-` prefixed token from 8 uppercase hex characters.
  /// Collisions are guarded by the unique constraint, not retried.
  pub fn generate() -> Self {
    let hex = Uuid::new_v4().simple().to_string();
    Self(format!("INV-{}", hex[..8].to_uppercase()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for InvoiceNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Invoice Status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
  #[default]
  Draft,
  Sent,
  Paid,
  Overdue,
  Cancelled,
}

impl InvoiceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      InvoiceStatus::Draft => "draft",
      InvoiceStatus::Sent => "sent",
      InvoiceStatus::Paid => "paid",
      InvoiceStatus::Overdue => "overdue",
      InvoiceStatus::Cancelled => "cancelled",
    }
  }
}

impl FromStr for InvoiceStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "draft" => Ok(InvoiceStatus::Draft),
      "sent" => Ok(InvoiceStatus::Sent),
      "paid" => Ok(InvoiceStatus::Paid),
      "overdue" => Ok(InvoiceStatus::Overdue),
      "cancelled" => Ok(InvoiceStatus::Cancelled),
      _ => Err(ValueObjectError::InvalidStatus(format!(
        "Unknown status: {}",
        s
      ))),
    }
  }
}

impl fmt::Display for InvoiceStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

// Line Item Description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescription(String);

impl ItemDescription {
  pub fn new(value: String) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidDescription(
        "Description cannot be empty".to_string(),
      ));
    }
    if trimmed.len() > 255 {
      return Err(ValueObjectError::InvalidDescription(
        "Description cannot exceed 255 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

// Item Amount - quantity or unit price, a currency-scale decimal.
// Absent values are coalesced to zero at computation time, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAmount(Decimal);

impl ItemAmount {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    // Max 2 decimal places
    if value.scale() > 2 {
      return Err(ValueObjectError::InvalidAmount(
        "Amount cannot have more than 2 decimal places".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_customer_name() {
    assert!(CustomerName::new("Acme Corp".to_string()).is_ok());
    assert!(CustomerName::new("".to_string()).is_err());
    assert!(CustomerName::new("   ".to_string()).is_err());
    assert_eq!(
      CustomerName::new("  Acme  ".to_string()).unwrap().value(),
      "Acme"
    );
    assert!(CustomerName::new("x".repeat(201)).is_err());
  }

  #[test]
  fn test_invoice_number() {
    assert!(InvoiceNumber::new("INV-001".to_string()).is_ok());
    assert!(InvoiceNumber::new("".to_string()).is_err());
    assert!(InvoiceNumber::new("x".repeat(51)).is_err());
  }

  #[test]
  fn test_invoice_number_generate_format() {
    let number = InvoiceNumber::generate();
    let value = number.value();
    assert!(value.starts_with("INV-"));
    assert_eq!(value.len(), 12);
    assert!(
      value[4..]
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    );
  }

  #[test]
  fn test_invoice_number_generate_unique() {
    let a = InvoiceNumber::generate();
    let b = InvoiceNumber::generate();
    assert_ne!(a, b);
  }

  #[test]
  fn test_invoice_status() {
    assert_eq!(InvoiceStatus::default(), InvoiceStatus::Draft);
    assert_eq!(
      InvoiceStatus::from_str("draft").unwrap(),
      InvoiceStatus::Draft
    );
    assert_eq!(InvoiceStatus::from_str("Paid").unwrap(), InvoiceStatus::Paid);
    assert_eq!(
      InvoiceStatus::from_str("CANCELLED").unwrap(),
      InvoiceStatus::Cancelled
    );
    assert!(InvoiceStatus::from_str("archived").is_err());
    assert_eq!(InvoiceStatus::Overdue.as_str(), "overdue");
  }

  #[test]
  fn test_item_description() {
    assert!(ItemDescription::new("Consulting".to_string()).is_ok());
    assert!(ItemDescription::new("".to_string()).is_err());
    assert!(ItemDescription::new("x".repeat(256)).is_err());
  }

  #[test]
  fn test_item_amount_scale() {
    assert!(ItemAmount::new(dec!(19.99)).is_ok());
    assert!(ItemAmount::new(dec!(3)).is_ok());
    assert!(ItemAmount::new(dec!(0.1)).is_ok());
    assert!(ItemAmount::new(dec!(1.999)).is_err());
  }

  #[test]
  fn test_item_amount_any_sign() {
    // Credit lines carry negative amounts
    assert!(ItemAmount::new(dec!(-5.25)).is_ok());
    assert_eq!(ItemAmount::new(dec!(-5.25)).unwrap().value(), dec!(-5.25));
  }
}
