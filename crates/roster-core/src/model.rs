//! Stored entities: the District → School → Teacher → Course → Student tree
//! plus the flat side tables carried by the fixture.
//!
//! Field names serialise in camelCase so the fixture document and the JSON API
//! share one shape. Entities are never structurally deleted; courses and
//! students change state through the methods below, which keep each flag and
//! its audit fields in step.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── Hierarchy ───────────────────────────────────────────────────────────────

/// The root of the containment tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
  pub id:             String,
  pub name:           String,
  pub code:           String,
  pub superintendent: String,
  pub contact_email:  String,
  pub contact_phone:  String,
  pub schools:        Vec<School>,
  /// Summary counters for display; not kept in step with the tree.
  #[serde(default)]
  pub total_schools:  u32,
  #[serde(default)]
  pub total_teachers: u32,
  #[serde(default)]
  pub total_students: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
  pub id:                String,
  pub name:              String,
  pub code:              String,
  #[serde(default)]
  pub total_teachers:    u32,
  #[serde(default)]
  pub verified_teachers: u32,
  /// Derived from the tree on load.
  #[serde(default)]
  pub total_courses:     u32,
  /// Derived from the tree on load and after every verify/unlock.
  #[serde(default)]
  pub verified_courses:  u32,
  pub teachers:          Vec<Teacher>,
}

impl School {
  /// Number of courses under this school, counted from the tree.
  pub fn count_courses(&self) -> u32 {
    self.teachers.iter().map(|t| t.courses.len() as u32).sum()
  }

  /// Number of verified courses under this school, counted from the tree.
  pub fn count_verified_courses(&self) -> u32 {
    self
      .teachers
      .iter()
      .flat_map(|t| &t.courses)
      .filter(|c| c.verified)
      .count() as u32
  }

  /// Bring the derived course counters back in line with the tree.
  pub fn recount_courses(&mut self) {
    self.total_courses = self.count_courses();
    self.verified_courses = self.count_verified_courses();
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
  pub id:         String,
  pub first_name: String,
  pub last_name:  String,
  pub staff_id:   String,
  pub position:   String,
  pub courses:    Vec<Course>,
}

impl Teacher {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// A course section. `verified`, `verified_date` and `verifying_educator` are
/// set together and cleared together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
  pub id:                 String,
  pub course_code:        String,
  pub section_number:     String,
  pub course_name:        String,
  pub begin_date:         NaiveDate,
  pub end_date:           NaiveDate,
  #[serde(default)]
  pub verified:           bool,
  #[serde(default)]
  pub verified_date:      Option<NaiveDate>,
  #[serde(default)]
  pub verifying_educator: Option<String>,
  pub students:           Vec<Student>,
}

impl Course {
  /// Mark the course verified, re-stamping the audit fields if it already
  /// was.
  pub fn verify(&mut self, verifying_educator: impl Into<String>, on: NaiveDate) {
    self.verified = true;
    self.verified_date = Some(on);
    self.verifying_educator = Some(verifying_educator.into());
  }

  pub fn unlock(&mut self) {
    self.verified = false;
    self.verified_date = None;
    self.verifying_educator = None;
  }

  pub fn student(&self, student_id: &str) -> Option<&Student> {
    self.students.iter().find(|s| s.id == student_id)
  }

  pub fn student_mut(&mut self, student_id: &str) -> Option<&mut Student> {
    self.students.iter_mut().find(|s| s.id == student_id)
  }

  pub fn active_students(&self) -> impl Iterator<Item = &Student> {
    self.students.iter().filter(|s| !s.removed)
  }

  /// Whether the flag and its audit fields agree.
  pub fn is_consistent(&self) -> bool {
    if self.verified {
      self.verified_date.is_some() && self.verifying_educator.is_some()
    } else {
      self.verified_date.is_none() && self.verifying_educator.is_none()
    }
  }
}

/// An enrolled student. Removal is a soft delete: the record stays in the
/// course and only `removed`/`removed_date` change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
  pub id:              String,
  pub first_name:      String,
  pub last_name:       String,
  /// Louisiana state student identifier.
  pub lasid:           String,
  pub grade_level:     String,
  pub birth_day:       NaiveDate,
  pub enrollment_date: NaiveDate,
  #[serde(default)]
  pub absences:        u32,
  #[serde(default)]
  pub removed:         bool,
  #[serde(default)]
  pub removed_date:    Option<NaiveDate>,
}

impl Student {
  /// Flag the student as removed. Returns `false` (and leaves the original
  /// stamp alone) if they already were.
  pub fn remove(&mut self, on: NaiveDate) -> bool {
    if self.removed {
      return false;
    }
    self.removed = true;
    self.removed_date = Some(on);
    true
  }

  /// Undo a removal. Returns `false` if the student was active.
  pub fn restore(&mut self) -> bool {
    if !self.removed {
      return false;
    }
    self.removed = false;
    self.removed_date = None;
    true
  }

  pub fn is_consistent(&self) -> bool {
    self.removed == self.removed_date.is_some()
  }
}

// ─── Users & notifications ───────────────────────────────────────────────────

/// A portal user. Carried as an opaque record; no credential handling lives
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:          String,
  pub username:    String,
  pub email:       String,
  pub first_name:  String,
  pub last_name:   String,
  pub role:        String,
  #[serde(default)]
  pub district:    Option<String>,
  #[serde(default)]
  pub schools:     Vec<String>,
  #[serde(default)]
  pub permissions: Vec<String>,
}

/// Notification category. Kinds the portal does not style are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
  Success,
  Warning,
  Info,
  #[serde(untagged)]
  Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
  pub id:      String,
  pub user_id: String,
  #[serde(rename = "type")]
  pub kind:    NotificationKind,
  pub title:   String,
  pub message: String,
  pub time:    DateTime<Utc>,
  #[serde(default)]
  pub read:    bool,
}

// ─── Reference data ──────────────────────────────────────────────────────────

/// An entry in the state course-code catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCode {
  pub code:         String,
  pub description:  String,
  #[serde(default)]
  pub subject:      Option<String>,
  /// Whether the course counts toward value-added modelling.
  #[serde(default)]
  pub vam_eligible: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn notification_kind_keeps_unknown_values() {
    let kind: NotificationKind = serde_json::from_str("\"error\"").unwrap();
    assert_eq!(kind, NotificationKind::Other("error".into()));
    assert_eq!(serde_json::to_string(&kind).unwrap(), "\"error\"");

    let known: NotificationKind = serde_json::from_str("\"warning\"").unwrap();
    assert_eq!(known, NotificationKind::Warning);
  }
}
