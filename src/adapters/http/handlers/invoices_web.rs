use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::http::{errors::ApiError, templates::TemplateEngine};
use crate::application::invoice::{
  GetInvoiceDetailsCommand, GetInvoiceDetailsUseCase, ListInvoicesUseCase, SaveInvoiceCommand,
  SaveInvoiceUseCase,
};
use crate::domain::invoice::HtmlToPdf;

// GET /invoices - List all invoices, most recent issue date first
pub async fn invoices_page(
  templates: web::Data<TemplateEngine>,
  list_invoices_use_case: web::Data<Arc<ListInvoicesUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = list_invoices_use_case.execute().await?;

  let mut context = tera::Context::new();
  context.insert("invoices", &response.invoices);

  let html = templates
    .render("pages/invoices.html.tera", &context)
    .map_err(|e| ApiError::Internal(format!("Template error: {}", e)))?;

  Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

// POST /invoices - Create or update an invoice together with its line items.
// The body carries the header fields, the row operations, and optionally a
// new customer name; everything commits atomically or not at all.
pub async fn save_invoice_submit(
  form: web::Json<SaveInvoiceCommand>,
  save_invoice_use_case: web::Data<Arc<SaveInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = save_invoice_use_case.execute(form.into_inner()).await?;
  Ok(HttpResponse::Ok().json(response))
}

// GET /invoices/{id} - Show invoice details
pub async fn invoice_details_page(
  path: web::Path<Uuid>,
  templates: web::Data<TemplateEngine>,
  get_invoice_details_use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = get_invoice_details_use_case
    .execute(GetInvoiceDetailsCommand {
      invoice_id: path.into_inner(),
    })
    .await?;

  let mut context = tera::Context::new();
  context.insert("invoice", &response);

  let html = templates
    .render("pages/invoice_detail.html.tera", &context)
    .map_err(|e| ApiError::Internal(format!("Template error: {}", e)))?;

  Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

// GET /invoices/{id}/pdf - Render the invoice as HTML and convert it to an
// inline PDF. A converter failure echoes the offending HTML back so the
// operator can see what failed to render.
pub async fn invoice_pdf(
  path: web::Path<Uuid>,
  templates: web::Data<TemplateEngine>,
  get_invoice_details_use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
  pdf_converter: web::Data<Arc<dyn HtmlToPdf>>,
) -> Result<HttpResponse, ApiError> {
  let response = get_invoice_details_use_case
    .execute(GetInvoiceDetailsCommand {
      invoice_id: path.into_inner(),
    })
    .await?;
  let invoice_number = response.invoice_number.clone();

  let mut context = tera::Context::new();
  context.insert("invoice", &response);

  let html = templates
    .render("pdf/invoice.html.tera", &context)
    .map_err(|e| ApiError::Internal(format!("Template error: {}", e)))?;

  match pdf_converter.convert(&html).await {
    Ok(bytes) => Ok(
      HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
          "Content-Disposition",
          format!("inline; filename=\"invoice_{}.pdf\"", invoice_number),
        ))
        .body(bytes),
    ),
    Err(e) => {
      tracing::error!("PDF conversion failed for invoice {}: {}", invoice_number, e);
      Ok(
        HttpResponse::InternalServerError()
          .content_type("text/html")
          .body(format!(
            "<h1>PDF rendering failed</h1><p>{}</p><pre>{}</pre>",
            tera::escape_html(&e.to_string()),
            tera::escape_html(&html)
          )),
      )
    }
  }
}
