pub mod customer_repository;
pub mod invoice_item_repository;
pub mod invoice_repository;

pub use customer_repository::PostgresCustomerRepository;
pub use invoice_item_repository::PostgresInvoiceItemRepository;
pub use invoice_repository::PostgresInvoiceRepository;

use crate::domain::invoice::InvoiceError;

/// Maps a PostgreSQL unique violation (SQLSTATE 23505) on the named
/// constraint to the given conflict error; anything else stays a database
/// error.
pub(crate) fn map_unique_violation(
  error: sqlx::Error,
  constraint: &str,
  conflict: InvoiceError,
) -> InvoiceError {
  if let sqlx::Error::Database(db_err) = &error {
    if db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint) {
      return conflict;
    }
  }
  InvoiceError::Database(error)
}
