use actix_web::web;
use std::sync::Arc;

use crate::application::invoice::{
  CreateCustomerUseCase, GetInvoiceDetailsUseCase, ListCustomersUseCase, ListInvoicesUseCase,
  SaveInvoiceUseCase,
};
use crate::domain::invoice::HtmlToPdf;

use super::handlers::{customers_web, invoices_web};
use super::templates::TemplateEngine;

/// Everything the web routes need, wired once at startup.
pub struct RouteDependencies {
  pub templates: TemplateEngine,
  pub save_invoice_use_case: Arc<SaveInvoiceUseCase>,
  pub list_invoices_use_case: Arc<ListInvoicesUseCase>,
  pub get_invoice_details_use_case: Arc<GetInvoiceDetailsUseCase>,
  pub create_customer_use_case: Arc<CreateCustomerUseCase>,
  pub list_customers_use_case: Arc<ListCustomersUseCase>,
  pub pdf_converter: Arc<dyn HtmlToPdf>,
}

/// Configure invoice and customer routes
///
/// # Routes
///
/// - GET /invoices - invoice list page
/// - POST /invoices - create or update an invoice with its line items
/// - GET /invoices/{id} - invoice detail page
/// - GET /invoices/{id}/pdf - invoice rendered as an inline PDF
/// - GET /customers - list customers
/// - POST /customers - create a customer
pub fn configure_routes(cfg: &mut web::ServiceConfig, deps: RouteDependencies) {
  cfg
    .app_data(web::Data::new(deps.templates))
    .app_data(web::Data::new(deps.save_invoice_use_case))
    .app_data(web::Data::new(deps.list_invoices_use_case))
    .app_data(web::Data::new(deps.get_invoice_details_use_case))
    .app_data(web::Data::new(deps.create_customer_use_case))
    .app_data(web::Data::new(deps.list_customers_use_case))
    .app_data(web::Data::new(deps.pdf_converter))
    .route("/invoices", web::get().to(invoices_web::invoices_page))
    .route("/invoices", web::post().to(invoices_web::save_invoice_submit))
    .route(
      "/invoices/{id}",
      web::get().to(invoices_web::invoice_details_page),
    )
    .route("/invoices/{id}/pdf", web::get().to(invoices_web::invoice_pdf))
    .route("/customers", web::get().to(customers_web::list_customers))
    .route("/customers", web::post().to(customers_web::create_customer));
}
