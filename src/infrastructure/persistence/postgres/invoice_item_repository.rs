use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::invoice::{
  InvoiceError, InvoiceItem, InvoiceItemRepository, ItemAmount, ItemDescription,
};

#[derive(Debug, FromRow)]
struct InvoiceItemRow {
  id: Uuid,
  invoice_id: Uuid,
  description: String,
  quantity: Option<Decimal>,
  unit_price: Option<Decimal>,
  line_order: i32,
}

impl TryFrom<InvoiceItemRow> for InvoiceItem {
  type Error = InvoiceError;

  fn try_from(row: InvoiceItemRow) -> Result<Self, Self::Error> {
    let description = ItemDescription::new(row.description)?;
    let quantity = row.quantity.map(ItemAmount::new).transpose()?;
    let unit_price = row.unit_price.map(ItemAmount::new).transpose()?;

    Ok(InvoiceItem {
      id: row.id,
      invoice_id: row.invoice_id,
      description,
      quantity,
      unit_price,
      line_order: row.line_order,
    })
  }
}

pub struct PostgresInvoiceItemRepository {
  pool: PgPool,
}

impl PostgresInvoiceItemRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InvoiceItemRepository for PostgresInvoiceItemRepository {
  async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceItemRow>(
      r#"
            SELECT id, invoice_id, description, quantity, unit_price, line_order
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY line_order ASC
            "#,
    )
    .bind(invoice_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}
