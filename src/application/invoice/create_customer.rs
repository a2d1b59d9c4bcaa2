use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::invoice::{CustomerName, InvoiceError, InvoiceService, ValidationErrors};

#[derive(Debug, Deserialize)]
pub struct CreateCustomerCommand {
  pub name: String,
  pub email: Option<String>,
  pub address: Option<String>,
  pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateCustomerResponse {
  pub customer_id: Uuid,
  pub name: String,
}

pub struct CreateCustomerUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateCustomerUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: CreateCustomerCommand,
  ) -> Result<CreateCustomerResponse, InvoiceError> {
    let name = CustomerName::new(command.name).map_err(|e| {
      let mut errors = ValidationErrors::new();
      errors.push_field("name", e.to_string());
      InvoiceError::Validation(errors)
    })?;

    let customer = self
      .invoice_service
      .create_customer(name, command.email, command.address, command.phone)
      .await?;

    Ok(CreateCustomerResponse {
      customer_id: customer.id,
      name: customer.name.into_inner(),
    })
  }
}
