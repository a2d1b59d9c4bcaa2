use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{
  CustomerRef, InvoiceError, InvoiceService, ItemChange, ItemFields, SaveInvoice,
};

/// One submitted line-item row. A row with an id refers to a stored item;
/// `delete` flags it for removal. A row without an id is a new item, and a
/// deleted row without an id never existed, so it is dropped silently.
#[derive(Debug, Deserialize)]
pub struct SaveInvoiceItemDto {
  pub id: Option<Uuid>,
  #[serde(default)]
  pub delete: bool,
  #[serde(default)]
  pub description: String,
  pub quantity: Option<Decimal>,
  pub unit_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SaveInvoiceCommand {
  pub invoice_id: Option<Uuid>,
  pub customer_id: Option<Uuid>,
  pub new_customer_name: Option<String>,
  pub invoice_number: Option<String>,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: Option<String>,
  pub notes: Option<String>,
  pub items: Vec<SaveInvoiceItemDto>,
}

#[derive(Debug, Serialize)]
pub struct SaveInvoiceResponse {
  pub invoice_id: Uuid,
}

pub struct SaveInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl SaveInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: SaveInvoiceCommand,
  ) -> Result<SaveInvoiceResponse, InvoiceError> {
    let customer = resolve_customer(command.customer_id, command.new_customer_name.as_deref());
    let items = map_rows(command.items);

    let invoice_id = self
      .invoice_service
      .save_invoice(SaveInvoice {
        invoice_id: command.invoice_id,
        customer,
        invoice_number: command.invoice_number,
        issue_date: command.issue_date,
        due_date: command.due_date,
        status: command.status,
        notes: command.notes,
        items,
      })
      .await?;

    Ok(SaveInvoiceResponse { invoice_id })
  }
}

/// A non-empty new-customer name wins over a selected customer id.
fn resolve_customer(customer_id: Option<Uuid>, new_name: Option<&str>) -> Option<CustomerRef> {
  match new_name.map(str::trim) {
    Some(name) if !name.is_empty() => Some(CustomerRef::New(name.to_string())),
    _ => customer_id.map(CustomerRef::Existing),
  }
}

fn map_rows(rows: Vec<SaveInvoiceItemDto>) -> Vec<ItemChange> {
  rows
    .into_iter()
    .filter_map(|row| {
      let fields = ItemFields {
        description: row.description,
        quantity: row.quantity,
        unit_price: row.unit_price,
      };
      match (row.id, row.delete) {
        (Some(id), true) => Some(ItemChange::Delete { id }),
        (Some(id), false) => Some(ItemChange::Update { id, fields }),
        (None, true) => None,
        (None, false) => Some(ItemChange::Add(fields)),
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_new_customer_name_takes_precedence() {
    let selected = Uuid::new_v4();
    match resolve_customer(Some(selected), Some("Fresh Co")) {
      Some(CustomerRef::New(name)) => assert_eq!(name, "Fresh Co"),
      other => panic!("expected new-customer ref, got {:?}", other),
    }
  }

  #[test]
  fn test_blank_new_customer_name_falls_back_to_selection() {
    let selected = Uuid::new_v4();
    match resolve_customer(Some(selected), Some("   ")) {
      Some(CustomerRef::Existing(id)) => assert_eq!(id, selected),
      other => panic!("expected existing-customer ref, got {:?}", other),
    }
    assert!(resolve_customer(None, None).is_none());
  }

  #[test]
  fn test_row_mapping() {
    let existing = Uuid::new_v4();
    let doomed = Uuid::new_v4();
    let rows = vec![
      SaveInvoiceItemDto {
        id: None,
        delete: false,
        description: "New row".to_string(),
        quantity: Some(dec!(1)),
        unit_price: Some(dec!(10.00)),
      },
      SaveInvoiceItemDto {
        id: Some(existing),
        delete: false,
        description: "Changed row".to_string(),
        quantity: Some(dec!(2)),
        unit_price: Some(dec!(5.00)),
      },
      SaveInvoiceItemDto {
        id: Some(doomed),
        delete: true,
        description: String::new(),
        quantity: None,
        unit_price: None,
      },
      // Deleted before ever being saved: not an operation at all
      SaveInvoiceItemDto {
        id: None,
        delete: true,
        description: "Scratched".to_string(),
        quantity: None,
        unit_price: None,
      },
    ];

    let changes = map_rows(rows);
    assert_eq!(changes.len(), 3);
    assert!(matches!(changes[0], ItemChange::Add(_)));
    assert!(matches!(changes[1], ItemChange::Update { id, .. } if id == existing));
    assert!(matches!(changes[2], ItemChange::Delete { id } if id == doomed));
  }
}
