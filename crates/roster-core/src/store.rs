//! The `RosterStore` trait.
//!
//! Implemented by storage backends (e.g. `roster-store-memory`). The HTTP
//! layer depends on this abstraction, not on any concrete backend.
//!
//! Every lookup of a specific id fails with [`crate::Error::NotFound`] when
//! the id is unknown. Child listings (`list_schools_of`, `list_teachers_of`,
//! `notifications_for`) return an empty list for an unknown parent instead.

use std::future::Future;

use crate::{
  model::{Course, CourseCode, District, Notification, School, Student},
  period::VerificationPeriod,
  stats::{DistrictStatistics, RosterRow, SchoolStatistics, VerificationStatistics},
  view::{CourseView, EducatorHit, SchoolView, TeacherView},
};

/// Upper bound on [`RosterStore::search_educators`] results.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// Abstraction over a roster store backend.
///
/// Mutations never remove records: courses toggle between verified and
/// unverified, students between active and removed.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Hierarchy reads ───────────────────────────────────────────────────

  /// All districts with their summary counters, in stored order.
  fn list_districts(
    &self,
  ) -> impl Future<Output = Result<Vec<District>, Self::Error>> + Send + '_;

  fn get_district<'a>(
    &'a self,
    district_id: &'a str,
  ) -> impl Future<Output = Result<District, Self::Error>> + Send + 'a;

  /// The district's schools; empty if the district is unknown.
  fn list_schools_of<'a>(
    &'a self,
    district_id: &'a str,
  ) -> impl Future<Output = Result<Vec<School>, Self::Error>> + Send + 'a;

  fn get_school<'a>(
    &'a self,
    school_id: &'a str,
  ) -> impl Future<Output = Result<SchoolView, Self::Error>> + Send + 'a;

  /// The school's teachers with ancestor names; empty if the school is
  /// unknown.
  fn list_teachers_of<'a>(
    &'a self,
    school_id: &'a str,
  ) -> impl Future<Output = Result<Vec<TeacherView>, Self::Error>> + Send + 'a;

  fn get_teacher<'a>(
    &'a self,
    teacher_id: &'a str,
  ) -> impl Future<Output = Result<TeacherView, Self::Error>> + Send + 'a;

  fn list_courses_of<'a>(
    &'a self,
    teacher_id: &'a str,
  ) -> impl Future<Output = Result<Vec<CourseView>, Self::Error>> + Send + 'a;

  fn get_course<'a>(
    &'a self,
    course_id: &'a str,
  ) -> impl Future<Output = Result<CourseView, Self::Error>> + Send + 'a;

  /// Case-insensitive substring search over teacher name, staff id and school
  /// name. At most [`MAX_SEARCH_RESULTS`] hits, in tree order.
  fn search_educators<'a>(
    &'a self,
    query: &'a str,
  ) -> impl Future<Output = Result<Vec<EducatorHit>, Self::Error>> + Send + 'a;

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Mark a course verified by `verifying_educator` as of today and
  /// recompute the owning school's verified-course counter.
  fn verify_course<'a>(
    &'a self,
    course_id: &'a str,
    verifying_educator: String,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + 'a;

  /// Clear a course's verification and recompute the school counter.
  fn unlock_course<'a>(
    &'a self,
    course_id: &'a str,
  ) -> impl Future<Output = Result<Course, Self::Error>> + Send + 'a;

  /// Soft-delete one student from a course.
  fn remove_student<'a>(
    &'a self,
    course_id: &'a str,
    student_id: &'a str,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + 'a;

  /// Soft-delete every active student in a course. Returns only the students
  /// whose state changed.
  fn remove_all_students<'a>(
    &'a self,
    course_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + 'a;

  /// Undo a removal.
  fn restore_student<'a>(
    &'a self,
    course_id: &'a str,
    student_id: &'a str,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + 'a;

  // ── Aggregates ────────────────────────────────────────────────────────

  fn verification_statistics(
    &self,
  ) -> impl Future<Output = Result<VerificationStatistics, Self::Error>> + Send + '_;

  fn district_statistics<'a>(
    &'a self,
    district_id: &'a str,
  ) -> impl Future<Output = Result<DistrictStatistics, Self::Error>> + Send + 'a;

  fn school_statistics<'a>(
    &'a self,
    school_id: &'a str,
  ) -> impl Future<Output = Result<SchoolStatistics, Self::Error>> + Send + 'a;

  /// One row per (course, student) pair, in tree order.
  fn export_roster(
    &self,
  ) -> impl Future<Output = Result<Vec<RosterRow>, Self::Error>> + Send + '_;

  // ── Periods ───────────────────────────────────────────────────────────

  /// The period record whose status is `active`.
  fn current_verification_period(
    &self,
  ) -> impl Future<Output = Result<VerificationPeriod, Self::Error>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  fn notifications_for<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + 'a;

  fn mark_notification_read<'a>(
    &'a self,
    notification_id: &'a str,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + 'a;

  /// Mark all of a user's notifications read and return the full list.
  fn mark_all_notifications_read<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + 'a;

  // ── Reference data ────────────────────────────────────────────────────

  fn validate_course_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<CourseCode, Self::Error>> + Send + 'a;

  fn vam_eligible_courses(
    &self,
  ) -> impl Future<Output = Result<Vec<CourseCode>, Self::Error>> + Send + '_;

  fn system_settings(
    &self,
  ) -> impl Future<Output = Result<serde_json::Value, Self::Error>> + Send + '_;
}
