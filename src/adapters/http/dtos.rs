use serde::Serialize;

/// Error payload returned by every failing endpoint.
///
/// `details` carries the aggregated per-field and per-row violations for
/// validation failures, so a caller can correct a whole submission at once.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  pub error: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}
