use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::invoice::{Customer, CustomerName, CustomerRepository, InvoiceError};

use super::map_unique_violation;

#[derive(Debug, FromRow)]
struct CustomerRow {
  id: Uuid,
  name: String,
  email: Option<String>,
  address: Option<String>,
  phone: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
  type Error = InvoiceError;

  fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
    let name = CustomerName::new(row.name)?;

    Ok(Customer {
      id: row.id,
      name,
      email: row.email,
      address: row.address,
      phone: row.phone,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub struct PostgresCustomerRepository {
  pool: PgPool,
}

impl PostgresCustomerRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
  async fn create(&self, customer: Customer) -> Result<Customer, InvoiceError> {
    let name_value = customer.name.value().to_string();

    let row = sqlx::query_as::<_, CustomerRow>(
      r#"
            INSERT INTO customers (id, name, email, address, phone, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, address, phone, created_at, updated_at
            "#,
    )
    .bind(customer.id)
    .bind(customer.name.value())
    .bind(&customer.email)
    .bind(&customer.address)
    .bind(&customer.phone)
    .bind(customer.created_at)
    .bind(customer.updated_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      map_unique_violation(
        e,
        "customers_name_key",
        InvoiceError::CustomerNameConflict(name_value),
      )
    })?;

    row.try_into()
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, InvoiceError> {
    let row = sqlx::query_as::<_, CustomerRow>(
      r#"
            SELECT id, name, email, address, phone, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, InvoiceError> {
    let row = sqlx::query_as::<_, CustomerRow>(
      r#"
            SELECT id, name, email, address, phone, created_at, updated_at
            FROM customers
            WHERE name = $1
            "#,
    )
    .bind(name)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError> {
    let rows = sqlx::query_as::<_, CustomerRow>(
      r#"
            SELECT id, name, email, address, phone, created_at, updated_at
            FROM customers
            ORDER BY name ASC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
