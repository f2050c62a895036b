//! Error type for loading fixtures into `roster-store-memory`.
//!
//! Store operations themselves fail with [`roster_core::Error`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
  #[error("failed to read fixture: {0}")]
  Io(#[from] std::io::Error),

  /// The document is not well-formed JSON.
  #[error("fixture is not valid json: {0}")]
  Json(serde_json::Error),

  /// The document is JSON but does not describe a valid roster tree.
  #[error("fixture schema error: {0}")]
  Schema(String),
}

impl From<serde_json::Error> for FixtureError {
  fn from(e: serde_json::Error) -> Self {
    match e.classify() {
      serde_json::error::Category::Data => Self::Schema(e.to_string()),
      _ => Self::Json(e),
    }
  }
}

impl From<FixtureError> for roster_core::Error {
  fn from(e: FixtureError) -> Self { roster_core::Error::Schema(e.to_string()) }
}
