//! Aggregate read models: verification statistics and the flat roster export.

use serde::{Deserialize, Serialize};

use crate::model::{Course, School, Student, Teacher};

/// `part` as a whole-number percentage of `whole`, rounding halves up.
/// Zero when `whole` is zero.
pub fn percentage(part: u32, whole: u32) -> u32 {
  if whole == 0 {
    return 0;
  }
  let (part, whole) = (u64::from(part), u64::from(whole));
  ((200 * part + whole) / (2 * whole)) as u32
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatistics {
  pub total_courses:       u32,
  pub verified_courses:    u32,
  pub verified_percentage: u32,
  pub pending_percentage:  u32,
}

impl VerificationStatistics {
  /// `verified_courses` is clamped to `total_courses`.
  pub fn new(total_courses: u32, verified_courses: u32) -> Self {
    let verified_courses = verified_courses.min(total_courses);
    let verified_percentage = percentage(verified_courses, total_courses);
    Self {
      total_courses,
      verified_courses,
      verified_percentage,
      pending_percentage: 100 - verified_percentage,
    }
  }
}

/// Running totals over the courses and students of a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
  pub total_courses:    u32,
  pub verified_courses: u32,
  pub total_students:   u32,
  pub removed_students: u32,
}

impl Tally {
  pub fn add_school(&mut self, school: &School) {
    for course in school.teachers.iter().flat_map(|t| &t.courses) {
      self.add_course(course);
    }
  }

  pub fn add_course(&mut self, course: &Course) {
    self.total_courses += 1;
    if course.verified {
      self.verified_courses += 1;
    }
    self.total_students += course.students.len() as u32;
    self.removed_students +=
      course.students.iter().filter(|s| s.removed).count() as u32;
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStatistics {
  pub district_id:             String,
  pub district_name:           String,
  pub total_schools:           u32,
  pub total_teachers:          u32,
  pub verified_teachers:       u32,
  pub total_courses:           u32,
  pub verified_courses:        u32,
  pub total_students:          u32,
  pub removed_students:        u32,
  pub verification_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolStatistics {
  pub school_id:               String,
  pub school_name:             String,
  pub district_name:           String,
  pub total_teachers:          u32,
  pub verified_teachers:       u32,
  pub total_courses:           u32,
  pub verified_courses:        u32,
  pub total_students:          u32,
  pub removed_students:        u32,
  pub verification_percentage: u32,
}

// ─── Export ──────────────────────────────────────────────────────────────────

/// One (course, student) pair in the bulk roster export. Field order and
/// names are the export's column contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
  #[serde(rename = "SchoolCd")]
  pub school_code:        String,
  #[serde(rename = "SchoolName")]
  pub school_name:        String,
  #[serde(rename = "CourseCode")]
  pub course_code:        String,
  #[serde(rename = "SectionNumber")]
  pub section_number:     String,
  #[serde(rename = "EducatorName")]
  pub educator_name:      String,
  #[serde(rename = "VerifiedDate")]
  pub verified_date:      String,
  #[serde(rename = "VerifyingEducator")]
  pub verifying_educator: String,
  #[serde(rename = "StudentIdNumber")]
  pub student_id_number:  String,
  #[serde(rename = "FirstName")]
  pub first_name:         String,
  #[serde(rename = "LastName")]
  pub last_name:          String,
  #[serde(rename = "BirthDay")]
  pub birth_day:          String,
  #[serde(rename = "GradeCode")]
  pub grade_code:         String,
  /// The removal date, or empty for an active student.
  #[serde(rename = "Removed")]
  pub removed:            String,
  #[serde(rename = "EnrollmentDate")]
  pub enrollment_date:    String,
  #[serde(rename = "Absences")]
  pub absences:           u32,
}

impl RosterRow {
  pub fn project(
    school: &School,
    teacher: &Teacher,
    course: &Course,
    student: &Student,
  ) -> Self {
    Self {
      school_code:        school.code.clone(),
      school_name:        school.name.clone(),
      course_code:        course.course_code.clone(),
      section_number:     course.section_number.clone(),
      educator_name:      teacher.full_name(),
      verified_date:      course
        .verified_date
        .map(|d| d.to_string())
        .unwrap_or_default(),
      verifying_educator: course.verifying_educator.clone().unwrap_or_default(),
      student_id_number:  student.lasid.clone(),
      first_name:         student.first_name.clone(),
      last_name:          student.last_name.clone(),
      birth_day:          student.birth_day.to_string(),
      grade_code:         student.grade_level.clone(),
      removed:            match (student.removed, student.removed_date) {
        (true, Some(date)) => date.to_string(),
        _ => String::new(),
      },
      enrollment_date:    student.enrollment_date.to_string(),
      absences:           student.absences,
    }
  }
}
