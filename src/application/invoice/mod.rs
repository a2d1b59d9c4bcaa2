pub mod create_customer;
pub mod get_invoice_details;
pub mod list_customers;
pub mod list_invoices;
pub mod save_invoice;

pub use create_customer::{CreateCustomerCommand, CreateCustomerResponse, CreateCustomerUseCase};
pub use get_invoice_details::{
  CustomerDetailsDto, GetInvoiceDetailsCommand, GetInvoiceDetailsUseCase, InvoiceDetailsResponse,
  InvoiceItemDto,
};
pub use list_customers::{CustomerDto, ListCustomersResponse, ListCustomersUseCase};
pub use list_invoices::{InvoiceListItemDto, ListInvoicesResponse, ListInvoicesUseCase};
pub use save_invoice::{
  SaveInvoiceCommand, SaveInvoiceItemDto, SaveInvoiceResponse, SaveInvoiceUseCase,
};
