//! The seed document and its validation.

use std::{collections::HashSet, path::Path};

use roster_core::{
  model::{CourseCode, District, Notification, User},
  period::VerificationPeriod,
};
use serde::{Deserialize, Serialize};

use crate::FixtureError;

/// The roster bundled with the crate.
pub const DEFAULT_FIXTURE: &str = include_str!("../fixtures/roster.json");

/// Everything a store is seeded with. Parsing produces owned values, so the
/// live store never shares state with the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
  pub districts:            Vec<District>,
  #[serde(default)]
  pub users:                Vec<User>,
  #[serde(default)]
  pub notifications:        Vec<Notification>,
  #[serde(default)]
  pub verification_periods: Vec<VerificationPeriod>,
  #[serde(default)]
  pub course_codes:         Vec<CourseCode>,
  #[serde(default)]
  pub system_settings:      serde_json::Value,
}

impl Fixture {
  /// Parse and validate a fixture document.
  pub fn from_json(json: &str) -> Result<Self, FixtureError> {
    let fixture: Self = serde_json::from_str(json)?;
    fixture.validate()?;
    Ok(fixture)
  }

  pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
    let json = tokio::fs::read_to_string(path).await?;
    Self::from_json(&json)
  }

  /// Check the structural rules serde cannot express: non-empty unique ids
  /// and flags that agree with their audit fields.
  pub fn validate(&self) -> Result<(), FixtureError> {
    let mut districts = Ids::new("district");
    let mut schools = Ids::new("school");
    let mut teachers = Ids::new("teacher");
    let mut courses = Ids::new("course");

    for district in &self.districts {
      districts.insert(&district.id)?;
      for school in &district.schools {
        schools.insert(&school.id)?;
        for teacher in &school.teachers {
          teachers.insert(&teacher.id)?;
          for course in &teacher.courses {
            courses.insert(&course.id)?;
            if !course.is_consistent() {
              return Err(FixtureError::Schema(format!(
                "course {}: verified flag disagrees with verifiedDate/verifyingEducator",
                course.id
              )));
            }
            let mut students = Ids::new("student");
            for student in &course.students {
              students.insert(&student.id).map_err(|e| {
                FixtureError::Schema(format!("course {}: {e}", course.id))
              })?;
              if !student.is_consistent() {
                return Err(FixtureError::Schema(format!(
                  "student {} in course {}: removed flag disagrees with removedDate",
                  student.id, course.id
                )));
              }
            }
          }
        }
      }
    }

    let mut notifications = Ids::new("notification");
    for notification in &self.notifications {
      notifications.insert(&notification.id)?;
    }

    Ok(())
  }
}

/// Tracks ids seen for one entity kind.
struct Ids<'a> {
  kind: &'static str,
  seen: HashSet<&'a str>,
}

impl<'a> Ids<'a> {
  fn new(kind: &'static str) -> Self { Self { kind, seen: HashSet::new() } }

  fn insert(&mut self, id: &'a str) -> Result<(), FixtureError> {
    if id.trim().is_empty() {
      return Err(FixtureError::Schema(format!("{} with empty id", self.kind)));
    }
    if !self.seen.insert(id) {
      return Err(FixtureError::Schema(format!(
        "duplicate {} id {id:?}",
        self.kind
      )));
    }
    Ok(())
  }
}
