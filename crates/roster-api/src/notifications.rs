//! Notification handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/{id}/notifications` | Empty list for an unknown user |
//! | `POST` | `/users/{id}/notifications/read` | Returns the full list |
//! | `POST` | `/notifications/{id}/read` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use roster_core::{model::Notification, store::RosterStore};

use crate::error::ApiError;

/// `GET /users/{id}/notifications`
pub async fn list<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, ApiError> {
  let notifications = store
    .notifications_for(&user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(notifications))
}

/// `POST /users/{id}/notifications/read`
pub async fn mark_all_read<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<Notification>>, ApiError> {
  let notifications = store
    .mark_all_notifications_read(&user_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(notifications))
}

/// `POST /notifications/{id}/read`
pub async fn mark_read<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Notification>, ApiError> {
  let notification = store
    .mark_notification_read(&id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(notification))
}
