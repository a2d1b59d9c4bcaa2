use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::invoice::{
  CustomerWrite, Invoice, InvoiceError, InvoiceNumber, InvoiceRepository, InvoiceStatus, SavePlan,
  ValidationErrors,
};

use super::map_unique_violation;

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: Uuid,
  customer_id: Uuid,
  invoice_number: String,
  issue_date: NaiveDate,
  due_date: NaiveDate,
  status: String,
  notes: Option<String>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
  type Error = InvoiceError;

  fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
    let invoice_number = InvoiceNumber::new(row.invoice_number)?;
    let status = InvoiceStatus::from_str(&row.status)?;

    Ok(Invoice {
      id: row.id,
      customer_id: row.customer_id,
      invoice_number,
      issue_date: row.issue_date,
      due_date: row.due_date,
      status,
      notes: row.notes,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  /// One transaction covers customer resolution, the header write, and every
  /// item operation. Any early return drops the transaction, which rolls
  /// everything back; a reader never observes a partially applied edit.
  async fn save(&self, plan: SavePlan) -> Result<Uuid, InvoiceError> {
    let mut tx = self.pool.begin().await?;

    let customer_id = resolve_customer(&mut tx, &plan.customer).await?;

    if plan.is_new {
      let invoice_number_value = plan.invoice_number.value().to_string();

      sqlx::query(
        r#"
            INSERT INTO invoices (
                id, customer_id, invoice_number, issue_date, due_date,
                status, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
            "#,
      )
      .bind(plan.invoice_id)
      .bind(customer_id)
      .bind(plan.invoice_number.value())
      .bind(plan.issue_date)
      .bind(plan.due_date)
      .bind(plan.status.as_str())
      .bind(&plan.notes)
      .execute(&mut *tx)
      .await
      .map_err(|e| {
        map_unique_violation(
          e,
          "invoices_invoice_number_key",
          InvoiceError::InvoiceNumberConflict(invoice_number_value),
        )
      })?;
    } else {
      // The stored invoice_number is never rewritten once assigned
      sqlx::query(
        r#"
            UPDATE invoices
            SET customer_id = $2, issue_date = $3, due_date = $4,
                status = $5, notes = $6, updated_at = now()
            WHERE id = $1
            "#,
      )
      .bind(plan.invoice_id)
      .bind(customer_id)
      .bind(plan.issue_date)
      .bind(plan.due_date)
      .bind(plan.status.as_str())
      .bind(&plan.notes)
      .execute(&mut *tx)
      .await?;
    }

    // Deletions first, then updates, then insertions
    for id in &plan.deletes {
      sqlx::query("DELETE FROM invoice_items WHERE id = $1 AND invoice_id = $2")
        .bind(id)
        .bind(plan.invoice_id)
        .execute(&mut *tx)
        .await?;
    }

    for item in &plan.updates {
      sqlx::query(
        r#"
            UPDATE invoice_items
            SET description = $3, quantity = $4, unit_price = $5, line_order = $6
            WHERE id = $1 AND invoice_id = $2
            "#,
      )
      .bind(item.id)
      .bind(plan.invoice_id)
      .bind(item.description.value())
      .bind(item.quantity.map(|q| q.value()))
      .bind(item.unit_price.map(|p| p.value()))
      .bind(item.line_order)
      .execute(&mut *tx)
      .await?;
    }

    for item in &plan.inserts {
      sqlx::query(
        r#"
            INSERT INTO invoice_items (id, invoice_id, description, quantity, unit_price, line_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
      )
      .bind(item.id)
      .bind(plan.invoice_id)
      .bind(item.description.value())
      .bind(item.quantity.map(|q| q.value()))
      .bind(item.unit_price.map(|p| p.value()))
      .bind(item.line_order)
      .execute(&mut *tx)
      .await?;
    }

    // Write-time re-check: an invoice with zero line items must never commit
    let remaining = sqlx::query_scalar::<_, i64>(
      "SELECT COUNT(*) FROM invoice_items WHERE invoice_id = $1",
    )
    .bind(plan.invoice_id)
    .fetch_one(&mut *tx)
    .await?;

    if remaining < 1 {
      let mut errors = ValidationErrors::new();
      errors.push_field("items", "An invoice must keep at least one line item");
      return Err(InvoiceError::Validation(errors));
    }

    tx.commit().await?;

    Ok(plan.invoice_id)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, customer_id, invoice_number, issue_date, due_date,
                   status, notes, created_at, updated_at
            FROM invoices
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn find_all_recent(&self) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, customer_id, invoice_number, issue_date, due_date,
                   status, notes, created_at, updated_at
            FROM invoices
            ORDER BY issue_date DESC, created_at DESC
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}

/// Resolves the customer inside the running transaction. A get-or-create by
/// exact name is idempotent, so resubmitting the same new-customer name
/// reuses the existing row instead of duplicating it.
async fn resolve_customer(
  tx: &mut Transaction<'_, Postgres>,
  customer: &CustomerWrite,
) -> Result<Uuid, InvoiceError> {
  match customer {
    CustomerWrite::Existing(id) => {
      let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
          .bind(id)
          .fetch_one(&mut **tx)
          .await?;

      if !exists {
        return Err(InvoiceError::CustomerNotFound(*id));
      }
      Ok(*id)
    }
    CustomerWrite::GetOrCreate(name) => {
      let found = sqlx::query_scalar::<_, Uuid>("SELECT id FROM customers WHERE name = $1")
        .bind(name.value())
        .fetch_optional(&mut **tx)
        .await?;

      if let Some(id) = found {
        return Ok(id);
      }

      let id = Uuid::new_v4();
      sqlx::query(
        "INSERT INTO customers (id, name, created_at, updated_at) VALUES ($1, $2, now(), now())",
      )
      .bind(id)
      .bind(name.value())
      .execute(&mut **tx)
      .await
      .map_err(|e| {
        map_unique_violation(
          e,
          "customers_name_key",
          InvoiceError::CustomerNameConflict(name.value().to_string()),
        )
      })?;

      Ok(id)
    }
  }
}
