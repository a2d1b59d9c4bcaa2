use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Customer, Invoice, InvoiceItem};
use super::errors::InvoiceError;
use super::services::SavePlan;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
  async fn create(&self, customer: Customer) -> Result<Customer, InvoiceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, InvoiceError>;
  async fn find_by_name(&self, name: &str) -> Result<Option<Customer>, InvoiceError>;
  async fn find_all(&self) -> Result<Vec<Customer>, InvoiceError>;
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  /// Commits a validated save plan as one atomic unit: customer resolution,
  /// header write, and item operations either all become visible or none do.
  async fn save(&self, plan: SavePlan) -> Result<Uuid, InvoiceError>;
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;
  /// All invoices, most recent issue date first.
  async fn find_all_recent(&self) -> Result<Vec<Invoice>, InvoiceError>;
}

#[async_trait]
pub trait InvoiceItemRepository: Send + Sync {
  async fn find_by_invoice_id(&self, invoice_id: Uuid) -> Result<Vec<InvoiceItem>, InvoiceError>;
}

/// External HTML-to-PDF conversion collaborator.
#[async_trait]
pub trait HtmlToPdf: Send + Sync {
  async fn convert(&self, html: &str) -> Result<Vec<u8>, InvoiceError>;
}
