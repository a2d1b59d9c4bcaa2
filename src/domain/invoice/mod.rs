pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Customer, Invoice, InvoiceItem, InvoiceTotals};
pub use errors::{InvoiceError, ValidationErrors, Violation};
pub use ports::{CustomerRepository, HtmlToPdf, InvoiceItemRepository, InvoiceRepository};
pub use services::{
  CustomerRef, CustomerWrite, InvoiceService, ItemChange, ItemFields, ItemWrite, SaveInvoice,
  SavePlan,
};
pub use value_objects::{
  CustomerName, InvoiceNumber, InvoiceStatus, ItemAmount, ItemDescription, ValueObjectError,
};
