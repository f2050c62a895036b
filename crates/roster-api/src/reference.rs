//! Period and reference-data handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/period` | Active period plus the window in effect now |
//! | `GET`  | `/course-codes/vam` | VAM-eligible codes |
//! | `GET`  | `/course-codes/{code}` | 404 if the code is unknown |
//! | `GET`  | `/settings` | Opaque settings document |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::Utc;
use roster_core::{
  model::CourseCode,
  period::{PeriodWindow, VerificationPeriod},
  store::RosterStore,
};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct PeriodResponse {
  pub period: VerificationPeriod,
  pub window: PeriodWindow,
}

/// `GET /period`
pub async fn current_period<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<PeriodResponse>, ApiError> {
  let period = store
    .current_verification_period()
    .await
    .map_err(ApiError::from_store)?;
  let window = period.window_at(Utc::now());
  Ok(Json(PeriodResponse { period, window }))
}

/// `GET /course-codes/{code}`
pub async fn course_code<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(code): Path<String>,
) -> Result<Json<CourseCode>, ApiError> {
  let code = store
    .validate_course_code(code.trim())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(code))
}

/// `GET /course-codes/vam`
pub async fn vam_eligible<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<CourseCode>>, ApiError> {
  let codes = store.vam_eligible_courses().await.map_err(ApiError::from_store)?;
  Ok(Json(codes))
}

/// `GET /settings`
pub async fn settings<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<serde_json::Value>, ApiError> {
  let settings = store.system_settings().await.map_err(ApiError::from_store)?;
  Ok(Json(settings))
}
