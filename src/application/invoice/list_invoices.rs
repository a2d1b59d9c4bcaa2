use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Serialize)]
pub struct InvoiceListItemDto {
  pub id: Uuid,
  pub invoice_number: String,
  pub customer_id: Uuid,
  pub customer_name: String,
  pub issue_date: NaiveDate,
  pub due_date: NaiveDate,
  pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self) -> Result<ListInvoicesResponse, InvoiceError> {
    let invoices = self.invoice_service.list_invoices().await?;

    let customer_names: HashMap<Uuid, String> = self
      .invoice_service
      .list_customers()
      .await?
      .into_iter()
      .map(|c| (c.id, c.name.into_inner()))
      .collect();

    let invoice_dtos = invoices
      .into_iter()
      .map(|invoice| InvoiceListItemDto {
        id: invoice.id,
        invoice_number: invoice.invoice_number.to_string(),
        customer_id: invoice.customer_id,
        customer_name: customer_names
          .get(&invoice.customer_id)
          .cloned()
          .unwrap_or_default(),
        issue_date: invoice.issue_date,
        due_date: invoice.due_date,
        status: invoice.status.as_str().to_string(),
      })
      .collect();

    Ok(ListInvoicesResponse {
      invoices: invoice_dtos,
    })
  }
}
