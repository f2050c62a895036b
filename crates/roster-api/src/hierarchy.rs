//! Read handlers for the district → school → teacher → course drill-down.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/districts` | Stored order |
//! | `GET`  | `/districts/{id}` | 404 if not found |
//! | `GET`  | `/districts/{id}/schools` | Empty list for an unknown district |
//! | `GET`  | `/schools/{id}` | Annotated with district |
//! | `GET`  | `/schools/{id}/teachers` | Empty list for an unknown school |
//! | `GET`  | `/teachers/{id}` | 404 if not found |
//! | `GET`  | `/teachers/{id}/courses` | 404 if the teacher is unknown |
//! | `GET`  | `/courses/{id}` | Annotated with every ancestor |
//! | `GET`  | `/search/educators?q=` | At most 10 hits |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use roster_core::{
  model::{District, School},
  store::RosterStore,
  view::{CourseView, EducatorHit, SchoolView, TeacherView},
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Districts ────────────────────────────────────────────────────────────────

/// `GET /districts`
pub async fn list_districts<S: RosterStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<District>>, ApiError> {
  let districts = store.list_districts().await.map_err(ApiError::from_store)?;
  Ok(Json(districts))
}

/// `GET /districts/{id}`
pub async fn get_district<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<District>, ApiError> {
  let district = store.get_district(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(district))
}

/// `GET /districts/{id}/schools`
pub async fn list_schools<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<School>>, ApiError> {
  let schools = store.list_schools_of(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(schools))
}

// ─── Schools ──────────────────────────────────────────────────────────────────

/// `GET /schools/{id}`
pub async fn get_school<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<SchoolView>, ApiError> {
  let school = store.get_school(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(school))
}

/// `GET /schools/{id}/teachers`
pub async fn list_teachers<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<TeacherView>>, ApiError> {
  let teachers = store.list_teachers_of(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(teachers))
}

// ─── Teachers & courses ───────────────────────────────────────────────────────

/// `GET /teachers/{id}`
pub async fn get_teacher<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<TeacherView>, ApiError> {
  let teacher = store.get_teacher(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(teacher))
}

/// `GET /teachers/{id}/courses`
pub async fn list_courses<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<CourseView>>, ApiError> {
  let courses = store.list_courses_of(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(courses))
}

/// `GET /courses/{id}`
pub async fn get_course<S: RosterStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<CourseView>, ApiError> {
  let course = store.get_course(&id).await.map_err(ApiError::from_store)?;
  Ok(Json(course))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  #[serde(default)]
  pub q: String,
}

/// `GET /search/educators?q=<text>`
pub async fn search_educators<S: RosterStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<EducatorHit>>, ApiError> {
  let hits = store
    .search_educators(params.q.trim())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(hits))
}
