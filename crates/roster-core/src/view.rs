//! Read-side projections.
//!
//! Stored entities hold no references to their ancestors. Screens that drill
//! down the hierarchy want ancestor names alongside each record, so queries
//! stitch them in here rather than denormalising the tree itself.

use serde::{Deserialize, Serialize};

use crate::model::{Course, District, School, Teacher};

/// A school annotated with its district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolView {
  #[serde(flatten)]
  pub school:        School,
  pub district_id:   String,
  pub district_name: String,
}

impl SchoolView {
  pub fn project(district: &District, school: &School) -> Self {
    Self {
      school:        school.clone(),
      district_id:   district.id.clone(),
      district_name: district.name.clone(),
    }
  }
}

/// A teacher annotated with their school and district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherView {
  #[serde(flatten)]
  pub teacher:       Teacher,
  pub school_id:     String,
  pub school_name:   String,
  pub district_id:   String,
  pub district_name: String,
}

impl TeacherView {
  pub fn project(district: &District, school: &School, teacher: &Teacher) -> Self {
    Self {
      teacher:       teacher.clone(),
      school_id:     school.id.clone(),
      school_name:   school.name.clone(),
      district_id:   district.id.clone(),
      district_name: district.name.clone(),
    }
  }
}

/// A course annotated with every ancestor's id and display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
  #[serde(flatten)]
  pub course:        Course,
  pub teacher_id:    String,
  pub teacher_name:  String,
  pub school_id:     String,
  pub school_name:   String,
  pub district_id:   String,
  pub district_name: String,
}

impl CourseView {
  pub fn project(
    district: &District,
    school: &School,
    teacher: &Teacher,
    course: &Course,
  ) -> Self {
    Self {
      course:        course.clone(),
      teacher_id:    teacher.id.clone(),
      teacher_name:  teacher.full_name(),
      school_id:     school.id.clone(),
      school_name:   school.name.clone(),
      district_id:   district.id.clone(),
      district_name: district.name.clone(),
    }
  }
}

/// One result row of an educator search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducatorHit {
  pub id:       String,
  pub name:     String,
  pub staff_id: String,
  pub school:   String,
  pub district: String,
  pub position: String,
}

impl EducatorHit {
  pub fn project(district: &District, school: &School, teacher: &Teacher) -> Self {
    Self {
      id:       teacher.id.clone(),
      name:     teacher.full_name(),
      staff_id: teacher.staff_id.clone(),
      school:   school.name.clone(),
      district: district.name.clone(),
      position: teacher.position.clone(),
    }
  }

  /// Case-insensitive substring match on full name, staff id, or school name.
  /// `needle` must already be lowercased.
  pub fn matches(school: &School, teacher: &Teacher, needle: &str) -> bool {
    teacher.full_name().to_lowercase().contains(needle)
      || teacher.staff_id.to_lowercase().contains(needle)
      || school.name.to_lowercase().contains(needle)
  }
}
