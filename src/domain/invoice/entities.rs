use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{
  CustomerName, InvoiceNumber, InvoiceStatus, ItemAmount, ItemDescription,
};

// Customer - party an invoice is issued to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
  pub id: Uuid,
  pub name: CustomerName,
  pub email: Option<String>,
  pub address: Option<String>,
  pub phone: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Customer {
  pub fn new(
    name: CustomerName,
    email: Option<String>,
    address: Option<String>,
    phone: Option<String>,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      address,
      phone,
      created_at: now,
      updated_at: now,
    }
  }
}

// Invoice - header row; total_amount is derived from items on every read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub invoice_number: InvoiceNumber,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: InvoiceStatus,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Invoice {
  pub fn new(
    customer_id: Uuid,
    invoice_number: InvoiceNumber,
    issue_date: NaiveDate,
    due_date: NaiveDate,
    status: InvoiceStatus,
    notes: Option<String>,
  ) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      customer_id,
      invoice_number,
      issue_date,
      due_date,
      status,
      notes,
      created_at: now,
      updated_at: now,
    }
  }
}

// Invoice Item - owned by exactly one invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub description: ItemDescription,
  pub quantity: Option<ItemAmount>,
  pub unit_price: Option<ItemAmount>,
  pub line_order: i32,
}

impl InvoiceItem {
  pub fn new(
    invoice_id: Uuid,
    description: ItemDescription,
    quantity: Option<ItemAmount>,
    unit_price: Option<ItemAmount>,
    line_order: i32,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      invoice_id,
      description,
      quantity,
      unit_price,
      line_order,
    }
  }

  /// Absent quantity or unit price counts as zero, not an error.
  pub fn line_total(&self) -> Decimal {
    let quantity = self.quantity.map(|q| q.value()).unwrap_or(Decimal::ZERO);
    let unit_price = self.unit_price.map(|p| p.value()).unwrap_or(Decimal::ZERO);
    quantity * unit_price
  }
}

// Invoice Totals - calculated, never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
  pub total_amount: Decimal,
}

impl InvoiceTotals {
  pub fn calculate(items: &[InvoiceItem]) -> Self {
    let total_amount = items
      .iter()
      .fold(Decimal::ZERO, |acc, item| acc + item.line_total());
    Self { total_amount }
  }
}
