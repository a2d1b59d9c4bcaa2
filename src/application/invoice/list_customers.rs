use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Serialize)]
pub struct CustomerDto {
  pub id: Uuid,
  pub name: String,
  pub email: Option<String>,
  pub address: Option<String>,
  pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListCustomersResponse {
  pub customers: Vec<CustomerDto>,
}

pub struct ListCustomersUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListCustomersUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self) -> Result<ListCustomersResponse, InvoiceError> {
    let customers = self.invoice_service.list_customers().await?;

    let customer_dtos = customers
      .into_iter()
      .map(|c| CustomerDto {
        id: c.id,
        name: c.name.into_inner(),
        email: c.email,
        address: c.address,
        phone: c.phone,
      })
      .collect();

    Ok(ListCustomersResponse {
      customers: customer_dtos,
    })
  }
}
