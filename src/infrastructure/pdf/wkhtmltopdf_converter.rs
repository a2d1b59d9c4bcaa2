use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::domain::invoice::{HtmlToPdf, InvoiceError};

/// HTML-to-PDF conversion through a spawned `wkhtmltopdf` process. The
/// document goes in on stdin and the PDF comes back on stdout, so no
/// temporary files are written.
pub struct WkHtmlToPdfConverter {
  binary_path: String,
}

impl WkHtmlToPdfConverter {
  pub fn new(binary_path: Option<String>) -> Self {
    let binary_path = binary_path.unwrap_or_else(|| "wkhtmltopdf".to_string());
    Self { binary_path }
  }
}

#[async_trait]
impl HtmlToPdf for WkHtmlToPdfConverter {
  async fn convert(&self, html: &str) -> Result<Vec<u8>, InvoiceError> {
    let mut child = Command::new(&self.binary_path)
      .args([
        "--page-size",
        "A4",
        "--margin-top",
        "10mm",
        "--margin-bottom",
        "10mm",
        "--margin-left",
        "10mm",
        "--margin-right",
        "10mm",
        "--quiet",
        "-",
        "-",
      ])
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|e| {
        InvoiceError::PdfRenderFailed(format!(
          "failed to start {}: {}. Is wkhtmltopdf installed?",
          self.binary_path, e
        ))
      })?;

    if let Some(mut stdin) = child.stdin.take() {
      stdin
        .write_all(html.as_bytes())
        .await
        .map_err(|e| InvoiceError::PdfRenderFailed(format!("failed to feed HTML: {}", e)))?;
      // stdin drops here, closing the pipe so the converter can finish
    }

    let output = child.wait_with_output().await.map_err(|e| {
      InvoiceError::PdfRenderFailed(format!("wkhtmltopdf did not finish: {}", e))
    })?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(InvoiceError::PdfRenderFailed(format!(
        "wkhtmltopdf failed: {}",
        stderr.trim()
      )));
    }

    if output.stdout.is_empty() {
      return Err(InvoiceError::PdfRenderFailed(
        "wkhtmltopdf produced no output".to_string(),
      ));
    }

    Ok(output.stdout)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_binary_path() {
    let converter = WkHtmlToPdfConverter::new(None);
    assert_eq!(converter.binary_path, "wkhtmltopdf");

    let converter = WkHtmlToPdfConverter::new(Some("/opt/wkhtmltopdf".to_string()));
    assert_eq!(converter.binary_path, "/opt/wkhtmltopdf");
  }
}
