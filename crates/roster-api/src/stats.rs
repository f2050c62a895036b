//! Aggregate handlers: verification statistics and the roster export.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/stats/verification` | Whole tree |
//! | `GET`  | `/stats/districts/{id}` | |
//! | `GET`  | `/stats/schools/{id}` | |
//! | `GET`  | `/export/roster` | CSV; `?format=json` for the raw rows |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::header,
  response::{IntoResponse, Response},
};
use roster_core::{
  stats::{DistrictStatistics, SchoolStatistics, VerificationStatistics},
  store::RosterStore,
};
use serde::Deserialize;

use crate::{error::ApiError, export};

/// `GET /stats/verification`
pub async fn verification<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<VerificationStatistics>, ApiError> {
  let stats = store
    .verification_statistics()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stats))
}

/// `GET /stats/districts/{id}`
pub async fn district<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<DistrictStatistics>, ApiError> {
  let stats = store
    .district_statistics(&id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(stats))
}

/// `GET /stats/schools/{id}`
pub async fn school<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<SchoolStatistics>, ApiError> {
  let stats = store.school_statistics(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(stats))
}

// ─── Export ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
  #[default]
  Csv,
  Json,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
  #[serde(default)]
  pub format: ExportFormat,
}

/// `GET /export/roster`
pub async fn export_roster<S: RosterStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ExportParams>,
) -> Result<Response, ApiError> {
  let rows = store.export_roster().await.map_err(ApiError::from_store)?;
  tracing::debug!(rows = rows.len(), format = ?params.format, "roster export");

  match params.format {
    ExportFormat::Json => Ok(Json(rows).into_response()),
    ExportFormat::Csv => {
      let body = export::to_csv(&rows).map_err(|e| ApiError::Store(Box::new(e)))?;
      Ok(
        (
          [
            (header::CONTENT_TYPE, export::CSV_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"roster.csv\""),
          ],
          body,
        )
          .into_response(),
      )
    }
  }
}
