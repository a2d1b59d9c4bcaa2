use std::sync::Arc;
use tera::Tera;

/// Tera wrapper shared across handlers. Templates are the presentation
/// collaborator: they take a fully resolved invoice and return HTML text.
#[derive(Clone)]
pub struct TemplateEngine {
  tera: Arc<Tera>,
}

impl TemplateEngine {
  /// Loads every template under `templates/`, with HTML autoescaping on.
  pub fn new() -> Result<Self, tera::Error> {
    let mut tera = Tera::new("templates/**/*.html.tera")?;
    tera.autoescape_on(vec!["html.tera", ".html"]);

    Ok(Self {
      tera: Arc::new(tera),
    })
  }

  pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
    self.tera.render(template, context)
  }
}
