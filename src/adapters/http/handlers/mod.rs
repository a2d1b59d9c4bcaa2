pub mod customers_web;
pub mod invoices_web;
