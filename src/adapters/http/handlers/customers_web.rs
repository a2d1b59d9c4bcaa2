use actix_web::{HttpResponse, web};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::errors::ApiError;
use crate::application::invoice::{
  CreateCustomerCommand, CreateCustomerUseCase, ListCustomersUseCase,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
  #[validate(length(
    min = 1,
    max = 200,
    message = "Name must be between 1 and 200 characters"
  ))]
  pub name: String,

  #[validate(email(message = "Invalid email format"))]
  pub email: Option<String>,

  pub address: Option<String>,

  pub phone: Option<String>,
}

// POST /customers - Create a customer directly (the other creation path is
// the new-customer name folded into an invoice submission)
pub async fn create_customer(
  form: web::Json<CreateCustomerRequest>,
  create_customer_use_case: web::Data<Arc<CreateCustomerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  form.validate()?;
  let form = form.into_inner();

  let response = create_customer_use_case
    .execute(CreateCustomerCommand {
      name: form.name,
      email: form.email,
      address: form.address,
      phone: form.phone,
    })
    .await?;

  Ok(HttpResponse::Created().json(response))
}

// GET /customers - List all customers, ordered by name
pub async fn list_customers(
  list_customers_use_case: web::Data<Arc<ListCustomersUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = list_customers_use_case.execute().await?;
  Ok(HttpResponse::Ok().json(response))
}
