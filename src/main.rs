use actix_web::{App, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billpress::{
  adapters::http::{RouteDependencies, TemplateEngine, configure_routes},
  application::invoice::{
    CreateCustomerUseCase, GetInvoiceDetailsUseCase, ListCustomersUseCase, ListInvoicesUseCase,
    SaveInvoiceUseCase,
  },
  domain::invoice::{HtmlToPdf, InvoiceService},
  infrastructure::{
    config::Config,
    pdf::WkHtmlToPdfConverter,
    persistence::postgres::{
      PostgresCustomerRepository, PostgresInvoiceItemRepository, PostgresInvoiceRepository,
    },
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "billpress=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting billpress");

  // Load configuration
  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database: {}", config.database.url);

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        format!(
          "Could not connect to database. Is PostgreSQL running at {}?",
          config.database.url
        ),
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .expect("Failed to run database migrations");
  tracing::info!("Database migrations completed");

  // Initialize repositories
  let customer_repo = Arc::new(PostgresCustomerRepository::new(db_pool.clone()));
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));
  let invoice_item_repo = Arc::new(PostgresInvoiceItemRepository::new(db_pool.clone()));

  // Initialize domain service
  let invoice_service = Arc::new(InvoiceService::new(
    customer_repo,
    invoice_repo,
    invoice_item_repo,
  ));

  // Initialize use cases
  let save_invoice_use_case = Arc::new(SaveInvoiceUseCase::new(invoice_service.clone()));
  let list_invoices_use_case = Arc::new(ListInvoicesUseCase::new(invoice_service.clone()));
  let get_invoice_details_use_case =
    Arc::new(GetInvoiceDetailsUseCase::new(invoice_service.clone()));
  let create_customer_use_case = Arc::new(CreateCustomerUseCase::new(invoice_service.clone()));
  let list_customers_use_case = Arc::new(ListCustomersUseCase::new(invoice_service.clone()));

  // Initialize template engine
  let templates = TemplateEngine::new().expect("Failed to initialize template engine");
  tracing::info!("Template engine initialized");

  // Initialize PDF converter
  let pdf_converter =
    Arc::new(WkHtmlToPdfConverter::new(config.pdf.wkhtmltopdf_path.clone())) as Arc<dyn HtmlToPdf>;
  tracing::info!("PDF converter initialized");

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server
  HttpServer::new(move || {
    App::new()
      // Add logging middleware
      .wrap(Logger::default())
      // Configure invoice and customer routes
      .configure(|cfg| {
        configure_routes(
          cfg,
          RouteDependencies {
            templates: templates.clone(),
            save_invoice_use_case: save_invoice_use_case.clone(),
            list_invoices_use_case: list_invoices_use_case.clone(),
            get_invoice_details_use_case: get_invoice_details_use_case.clone(),
            create_customer_use_case: create_customer_use_case.clone(),
            list_customers_use_case: list_customers_use_case.clone(),
            pdf_converter: pdf_converter.clone(),
          },
        )
      })
      // Health check endpoint
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
