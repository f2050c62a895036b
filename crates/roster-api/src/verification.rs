//! Roster edit handlers and the verification-window guard.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/courses/{id}/verify` | Body: `{"verifyingEducator":"..."}` |
//! | `POST`   | `/courses/{id}/unlock` | |
//! | `DELETE` | `/courses/{id}/students` | Removes every active student |
//! | `DELETE` | `/courses/{id}/students/{student_id}` | Soft delete |
//! | `POST`   | `/courses/{id}/students/{student_id}/restore` | Undo a removal |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Request, State},
  middleware::Next,
  response::Response,
};
use chrono::Utc;
use roster_core::{
  model::{Course, Student},
  store::RosterStore,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Courses ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBody {
  pub verifying_educator: String,
}

/// `POST /courses/{id}/verify`
pub async fn verify_course<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<VerifyBody>,
) -> Result<Json<Course>, ApiError> {
  let educator = body.verifying_educator.trim();
  if educator.is_empty() {
    return Err(ApiError::BadRequest("verifyingEducator must not be empty".into()));
  }
  let course = store
    .verify_course(&id, educator.to_owned())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(course))
}

/// `POST /courses/{id}/unlock`
pub async fn unlock_course<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Course>, ApiError> {
  let course = store.unlock_course(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(course))
}

// ─── Students ─────────────────────────────────────────────────────────────────

/// `DELETE /courses/{id}/students/{student_id}`
pub async fn remove_student<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path((course_id, student_id)): Path<(String, String)>,
) -> Result<Json<Student>, ApiError> {
  let student = store
    .remove_student(&course_id, &student_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(student))
}

/// `DELETE /courses/{id}/students`. Returns the students that changed.
pub async fn remove_all_students<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(course_id): Path<String>,
) -> Result<Json<Vec<Student>>, ApiError> {
  let removed = store
    .remove_all_students(&course_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(removed))
}

/// `POST /courses/{id}/students/{student_id}/restore`
pub async fn restore_student<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path((course_id, student_id)): Path<(String, String)>,
) -> Result<Json<Student>, ApiError> {
  let student = store
    .restore_student(&course_id, &student_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(student))
}

// ─── Window guard ─────────────────────────────────────────────────────────────

/// Middleware that rejects roster edits with `409 Conflict` unless the active
/// period is currently in its verification window.
pub async fn require_verification_window<S: RosterStore>(
  State(store): State<Arc<S>>,
  req: Request,
  next: Next,
) -> Result<Response, ApiError> {
  let period = store
    .current_verification_period()
    .await
    .map_err(|e| match ApiError::from_store(e) {
      ApiError::NotFound(_) => {
        ApiError::Conflict("no verification period is active".into())
      }
      other => other,
    })?;

  let window = period.window_at(Utc::now());
  if !window.allows_edits() {
    tracing::warn!(
      method = %req.method(),
      uri = %req.uri(),
      %window,
      "roster edit rejected outside verification window"
    );
    return Err(ApiError::Conflict(format!(
      "roster edits are not allowed during the {window} window of {}",
      period.name
    )));
  }
  Ok(next.run(req).await)
}
