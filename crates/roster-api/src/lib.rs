//! JSON REST API for the roster hierarchy.
//!
//! Exposes an axum [`Router`] backed by any [`roster_core::store::RosterStore`].
//! Authentication and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(store.clone(), ApiOptions::default()))
//! ```

pub mod error;
pub mod export;
pub mod hierarchy;
pub mod notifications;
pub mod reference;
pub mod stats;
pub mod verification;

use std::sync::Arc;

use axum::{
  Router, middleware,
  routing::{delete, get, post},
};
use roster_core::store::RosterStore;

pub use error::ApiError;

/// Behaviour switches for [`api_router`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiOptions {
  /// Reject roster edits with `409 Conflict` outside the active period's
  /// verification window.
  pub enforce_verification_window: bool,
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, options: ApiOptions) -> Router<()>
where
  S: RosterStore + 'static,
{
  let reads = Router::new()
    // Hierarchy
    .route("/districts", get(hierarchy::list_districts::<S>))
    .route("/districts/{id}", get(hierarchy::get_district::<S>))
    .route("/districts/{id}/schools", get(hierarchy::list_schools::<S>))
    .route("/schools/{id}", get(hierarchy::get_school::<S>))
    .route("/schools/{id}/teachers", get(hierarchy::list_teachers::<S>))
    .route("/teachers/{id}", get(hierarchy::get_teacher::<S>))
    .route("/teachers/{id}/courses", get(hierarchy::list_courses::<S>))
    .route("/courses/{id}", get(hierarchy::get_course::<S>))
    .route("/search/educators", get(hierarchy::search_educators::<S>))
    // Aggregates
    .route("/stats/verification", get(stats::verification::<S>))
    .route("/stats/districts/{id}", get(stats::district::<S>))
    .route("/stats/schools/{id}", get(stats::school::<S>))
    .route("/export/roster", get(stats::export_roster::<S>))
    // Notifications
    .route("/users/{id}/notifications", get(notifications::list::<S>))
    .route("/users/{id}/notifications/read", post(notifications::mark_all_read::<S>))
    .route("/notifications/{id}/read", post(notifications::mark_read::<S>))
    // Reference data
    .route("/period", get(reference::current_period::<S>))
    .route("/course-codes/vam", get(reference::vam_eligible::<S>))
    .route("/course-codes/{code}", get(reference::course_code::<S>))
    .route("/settings", get(reference::settings::<S>));

  let mut edits = Router::new()
    .route("/courses/{id}/verify", post(verification::verify_course::<S>))
    .route("/courses/{id}/unlock", post(verification::unlock_course::<S>))
    .route("/courses/{id}/students", delete(verification::remove_all_students::<S>))
    .route(
      "/courses/{id}/students/{student_id}",
      delete(verification::remove_student::<S>),
    )
    .route(
      "/courses/{id}/students/{student_id}/restore",
      post(verification::restore_student::<S>),
    );
  if options.enforce_verification_window {
    edits = edits.route_layer(middleware::from_fn_with_state(
      store.clone(),
      verification::require_verification_window::<S>,
    ));
  }

  reads.merge(edits).with_state(store)
}

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use chrono::{Duration, Utc};
  use roster_store_memory::MemoryStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  fn bundled() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_default_fixture().unwrap())
  }

  async fn send(
    router: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    router.oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn read_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn open(store: &Arc<MemoryStore>) -> Router {
    api_router(store.clone(), ApiOptions::default())
  }

  // ── Reads ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_districts_returns_tree_roots() {
    let resp = send(open(&bundled()), "GET", "/districts", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["id"], "dist-009");
  }

  #[tokio::test]
  async fn unknown_course_is_404_with_error_body() {
    let resp = send(open(&bundled()), "GET", "/courses/nonexistent-id", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = read_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("nonexistent-id"));
  }

  #[tokio::test]
  async fn unknown_school_lists_no_teachers() {
    let resp = send(open(&bundled()), "GET", "/schools/nope/teachers", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await, json!([]));
  }

  #[tokio::test]
  async fn course_view_is_flattened_with_ancestors() {
    let resp = send(open(&bundled()), "GET", "/courses/crs-5001", None).await;
    let body = read_json(resp).await;
    assert_eq!(body["id"], "crs-5001");
    assert_eq!(body["teacherName"], "Maria Thibodeaux");
    assert_eq!(body["schoolId"], "sch-009012");
    assert_eq!(body["districtId"], "dist-009");
  }

  #[tokio::test]
  async fn search_query_is_trimmed() {
    let resp = send(open(&bundled()), "GET", "/search/educators?q=%20landry%20", None).await;
    let body = read_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "James Landry");
  }

  #[tokio::test]
  async fn vam_route_is_not_a_course_code() {
    let store = bundled();
    let resp = send(open(&store), "GET", "/course-codes/vam", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await.as_array().unwrap().len(), 5);

    let resp = send(open(&store), "GET", "/course-codes/160301", None).await;
    assert_eq!(read_json(resp).await["description"], "Algebra I");

    let resp = send(open(&store), "GET", "/course-codes/999999", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Edits ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn verify_updates_statistics() {
    let store = bundled();
    let resp = send(
      open(&store),
      "POST",
      "/courses/crs-5002/verify",
      Some(json!({ "verifyingEducator": "Renee Cormier" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let course = read_json(resp).await;
    assert_eq!(course["verified"], true);
    assert_eq!(course["verifyingEducator"], "Renee Cormier");

    let resp = send(open(&store), "GET", "/stats/verification", None).await;
    let stats = read_json(resp).await;
    assert_eq!(stats["verifiedCourses"], 3);
    assert_eq!(stats["verifiedPercentage"], 50);
  }

  #[tokio::test]
  async fn verify_without_educator_is_400() {
    let store = bundled();
    let resp = send(
      open(&store),
      "POST",
      "/courses/crs-5002/verify",
      Some(json!({ "verifyingEducator": "  " })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(open(&store), "GET", "/courses/crs-5002", None).await;
    assert_eq!(read_json(resp).await["verified"], false);
  }

  #[tokio::test]
  async fn remove_and_restore_student() {
    let store = bundled();
    let resp =
      send(open(&store), "DELETE", "/courses/crs-5001/students/stu-9001", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await["removed"], true);

    let resp = send(
      open(&store),
      "POST",
      "/courses/crs-5001/students/stu-9001/restore",
      None,
    )
    .await;
    let student = read_json(resp).await;
    assert_eq!(student["removed"], false);
    assert_eq!(student["removedDate"], Value::Null);

    let resp =
      send(open(&store), "DELETE", "/courses/crs-5001/students/nope", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn remove_all_returns_changed_students() {
    let store = bundled();
    let resp = send(open(&store), "DELETE", "/courses/crs-5003/students", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let changed = read_json(resp).await;
    let changed = changed.as_array().unwrap();
    assert!(changed.iter().all(|s| s["id"] != "stu-9007"));
    assert!(changed.iter().all(|s| s["removed"] == true));
  }

  // ── Export ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn export_is_csv_by_default() {
    let resp = send(open(&bundled()), "GET", "/export/roster", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], export::CSV_CONTENT_TYPE);
    assert!(
      resp.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("roster.csv")
    );
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 14);
    assert!(lines[0].starts_with("SchoolCd,SchoolName,CourseCode"));
  }

  #[tokio::test]
  async fn export_json_format() {
    let resp = send(open(&bundled()), "GET", "/export/roster?format=json", None).await;
    let rows = read_json(resp).await;
    assert_eq!(rows.as_array().unwrap().len(), 13);
    assert_eq!(rows[0]["SchoolCd"], "009012");
  }

  // ── Notifications ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn notifications_mark_all_read() {
    let store = bundled();
    let resp = send(open(&store), "GET", "/users/usr-001/notifications", None).await;
    let before = read_json(resp).await;
    assert!(!before.as_array().unwrap().is_empty());

    let resp =
      send(open(&store), "POST", "/users/usr-001/notifications/read", None).await;
    let after = read_json(resp).await;
    assert!(after.as_array().unwrap().iter().all(|n| n["read"] == true));

    let resp = send(open(&store), "POST", "/notifications/nope/read", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Verification window ─────────────────────────────────────────────────────

  /// A one-course tree with an active period whose verification window is
  /// offset `days` from now.
  fn windowed(days: i64) -> Arc<MemoryStore> {
    let now = Utc::now();
    let v_start = now + Duration::days(days) - Duration::days(1);
    let v_end = now + Duration::days(days) + Duration::days(1);
    let json = json!({
      "districts": [{
        "id": "D1", "name": "Acadia Parish", "code": "001",
        "superintendent": "S. Doe", "contactEmail": "sup@acadia.test",
        "contactPhone": "337-555-0101",
        "schools": [{
          "id": "S1", "name": "Crowley High", "code": "001010",
          "teachers": [{
            "id": "T1", "firstName": "Rosa", "lastName": "Parks",
            "staffId": "LA000123", "position": "Teacher",
            "courses": [{
              "id": "C1", "courseCode": "160301", "sectionNumber": "01",
              "courseName": "Algebra I",
              "beginDate": "2025-08-11", "endDate": "2026-05-22",
              "verified": false, "verifiedDate": null, "verifyingEducator": null,
              "students": []
            }]
          }]
        }]
      }],
      "verificationPeriods": [{
        "id": "p1", "name": "Test period", "status": "active",
        "viewOnlyStart": (v_start - Duration::days(30)).to_rfc3339(),
        "viewOnlyEnd": (v_start - Duration::days(10)).to_rfc3339(),
        "verificationStart": v_start.to_rfc3339(),
        "verificationEnd": v_end.to_rfc3339(),
      }]
    });
    Arc::new(MemoryStore::from_json(&json.to_string()).unwrap())
  }

  fn enforced(store: &Arc<MemoryStore>) -> Router {
    api_router(store.clone(), ApiOptions { enforce_verification_window: true })
  }

  fn verify_body() -> Option<Value> { Some(json!({ "verifyingEducator": "Jane Doe" })) }

  #[tokio::test]
  async fn edits_pass_inside_verification_window() {
    let store = windowed(0);
    let resp = send(enforced(&store), "POST", "/courses/C1/verify", verify_body()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(enforced(&store), "GET", "/period", None).await;
    assert_eq!(read_json(resp).await["window"], "verification");
  }

  #[tokio::test]
  async fn edits_conflict_outside_verification_window() {
    let store = windowed(60);
    let resp = send(enforced(&store), "POST", "/courses/C1/verify", verify_body()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = send(enforced(&store), "GET", "/courses/C1", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await["verified"], false);

    let resp = send(enforced(&store), "GET", "/period", None).await;
    assert_eq!(read_json(resp).await["window"], "closed");
  }

  #[tokio::test]
  async fn edits_conflict_without_active_period() {
    let store = Arc::new(
      MemoryStore::from_json(r#"{ "districts": [], "verificationPeriods": [] }"#).unwrap(),
    );
    let resp = send(enforced(&store), "POST", "/courses/C1/unlock", None).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = send(open(&store), "POST", "/courses/C1/unlock", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
