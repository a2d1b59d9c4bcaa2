use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Deserialize)]
pub struct GetInvoiceDetailsCommand {
  pub invoice_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CustomerDetailsDto {
  pub id: Uuid,
  pub name: String,
  pub email: Option<String>,
  pub address: Option<String>,
  pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceItemDto {
  pub id: Uuid,
  pub description: String,
  pub quantity: Option<Decimal>,
  pub unit_price: Option<Decimal>,
  pub line_total: Decimal,
  pub line_order: i32,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetailsResponse {
  pub id: Uuid,
  pub invoice_number: String,
  pub customer: CustomerDetailsDto,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: String,
  pub notes: Option<String>,
  pub items: Vec<InvoiceItemDto>,
  pub total_amount: Decimal,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

pub struct GetInvoiceDetailsUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceDetailsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: GetInvoiceDetailsCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let (invoice, customer, items, totals) = self
      .invoice_service
      .get_invoice_with_details(command.invoice_id)
      .await?;

    let item_dtos = items
      .iter()
      .map(|item| InvoiceItemDto {
        id: item.id,
        description: item.description.value().to_string(),
        quantity: item.quantity.map(|q| q.value()),
        unit_price: item.unit_price.map(|p| p.value()),
        line_total: item.line_total(),
        line_order: item.line_order,
      })
      .collect();

    Ok(InvoiceDetailsResponse {
      id: invoice.id,
      invoice_number: invoice.invoice_number.to_string(),
      customer: CustomerDetailsDto {
        id: customer.id,
        name: customer.name.value().to_string(),
        email: customer.email,
        address: customer.address,
        phone: customer.phone,
      },
      issue_date: invoice.issue_date,
      due_date: invoice.due_date,
      status: invoice.status.as_str().to_string(),
      notes: invoice.notes,
      items: item_dtos,
      total_amount: totals.total_amount,
      created_at: invoice.created_at,
      updated_at: invoice.updated_at,
    })
  }
}
