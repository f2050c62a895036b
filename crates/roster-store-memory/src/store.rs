//! [`MemoryStore`], the in-memory implementation of [`RosterStore`].

use std::{path::Path, sync::Arc};

use chrono::{NaiveDate, Utc};
use roster_core::{
  Entity, Error, Result,
  model::{Course, CourseCode, District, Notification, School, Student},
  period::{PeriodStatus, VerificationPeriod},
  stats::{
    DistrictStatistics, RosterRow, SchoolStatistics, Tally, VerificationStatistics,
    percentage,
  },
  store::{MAX_SEARCH_RESULTS, RosterStore},
  view::{CourseView, EducatorHit, SchoolView, TeacherView},
};
use tokio::sync::RwLock;

use crate::{
  DEFAULT_FIXTURE, Fixture, FixtureError, LatencyProfile, Op,
  index::{CoursePos, Index, SchoolPos, TeacherPos},
};

// ─── Live state ──────────────────────────────────────────────────────────────

/// Everything the store owns, guarded as one unit.
struct Roster {
  districts:     Vec<District>,
  index:         Index,
  notifications: Vec<Notification>,
  periods:       Vec<VerificationPeriod>,
  course_codes:  Vec<CourseCode>,
  settings:      serde_json::Value,
}

impl Roster {
  fn seed(fixture: Fixture) -> Self {
    let mut districts = fixture.districts;
    for school in districts.iter_mut().flat_map(|d| &mut d.schools) {
      school.recount_courses();
    }
    let index = Index::build(&districts);
    Self {
      districts,
      index,
      notifications: fixture.notifications,
      periods: fixture.verification_periods,
      course_codes: fixture.course_codes,
      settings: fixture.system_settings,
    }
  }

  fn district_pos(&self, id: &str) -> Result<usize> {
    self
      .index
      .districts
      .get(id)
      .copied()
      .ok_or_else(|| Error::not_found(Entity::District, id))
  }

  fn school_pos(&self, id: &str) -> Result<SchoolPos> {
    self
      .index
      .schools
      .get(id)
      .copied()
      .ok_or_else(|| Error::not_found(Entity::School, id))
  }

  fn teacher_pos(&self, id: &str) -> Result<TeacherPos> {
    self
      .index
      .teachers
      .get(id)
      .copied()
      .ok_or_else(|| Error::not_found(Entity::Teacher, id))
  }

  fn course_pos(&self, id: &str) -> Result<CoursePos> {
    self
      .index
      .courses
      .get(id)
      .copied()
      .ok_or_else(|| Error::not_found(Entity::Course, id))
  }

  fn school(&self, pos: SchoolPos) -> (&District, &School) {
    let district = &self.districts[pos.district];
    (district, &district.schools[pos.school])
  }

  fn school_mut(&mut self, pos: SchoolPos) -> &mut School {
    &mut self.districts[pos.district].schools[pos.school]
  }

  fn course_mut(&mut self, pos: CoursePos) -> &mut Course {
    &mut self.districts[pos.district].schools[pos.school].teachers[pos.teacher]
      .courses[pos.course]
  }

  fn course_view(&self, pos: CoursePos) -> CourseView {
    let district = &self.districts[pos.district];
    let school = &district.schools[pos.school];
    let teacher = &school.teachers[pos.teacher];
    CourseView::project(district, school, teacher, &teacher.courses[pos.course])
  }

  /// Report the first record that breaks a tree invariant.
  fn audit(&self) -> Result<()> {
    for school in self.districts.iter().flat_map(|d| &d.schools) {
      let verified = school.count_verified_courses();
      if school.verified_courses != verified {
        return Err(Error::InvariantViolation(format!(
          "school {}: verifiedCourses is {} but {verified} courses are verified",
          school.id, school.verified_courses
        )));
      }
      let total = school.count_courses();
      if school.total_courses != total {
        return Err(Error::InvariantViolation(format!(
          "school {}: totalCourses is {} but it has {total} courses",
          school.id, school.total_courses
        )));
      }
      for course in school.teachers.iter().flat_map(|t| &t.courses) {
        if !course.is_consistent() {
          return Err(Error::InvariantViolation(format!(
            "course {}: verified flag disagrees with its audit fields",
            course.id
          )));
        }
        if let Some(student) = course.students.iter().find(|s| !s.is_consistent()) {
          return Err(Error::InvariantViolation(format!(
            "student {} in course {}: removed flag disagrees with removedDate",
            student.id, course.id
          )));
        }
      }
    }
    Ok(())
  }
}

fn today() -> NaiveDate { Utc::now().date_naive() }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store held entirely in memory.
///
/// Cloning is cheap and clones share the same tree. Reads take the shared lock,
/// mutations the exclusive lock for their whole duration, so no caller ever
/// observes a half-applied mutation. Concurrent writes to the same field are
/// last-writer-wins.
#[derive(Clone)]
pub struct MemoryStore {
  roster:  Arc<RwLock<Roster>>,
  latency: LatencyProfile,
}

impl MemoryStore {
  /// Validate `fixture` and seed a store from it.
  pub fn from_fixture(fixture: Fixture) -> Result<Self, FixtureError> {
    fixture.validate()?;
    Ok(Self::seed(fixture))
  }

  /// Parse, validate and seed from a JSON document.
  pub fn from_json(json: &str) -> Result<Self, FixtureError> {
    Ok(Self::seed(Fixture::from_json(json)?))
  }

  /// Load the fixture at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
    Ok(Self::seed(Fixture::from_path(path).await?))
  }

  /// Seed from the roster bundled with the crate.
  pub fn with_default_fixture() -> Result<Self, FixtureError> {
    Self::from_json(DEFAULT_FIXTURE)
  }

  fn seed(fixture: Fixture) -> Self {
    let roster = Roster::seed(fixture);
    tracing::info!(
      districts = roster.districts.len(),
      schools = roster.index.schools.len(),
      teachers = roster.index.teachers.len(),
      courses = roster.index.courses.len(),
      "roster loaded"
    );
    Self {
      roster:  Arc::new(RwLock::new(roster)),
      latency: LatencyProfile::Disabled,
    }
  }

  pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
    self.latency = latency;
    self
  }

  pub fn latency(&self) -> LatencyProfile { self.latency }

  /// Check every tree invariant, failing with
  /// [`Error::InvariantViolation`] on the first broken one.
  pub async fn audit(&self) -> Result<()> { self.roster.read().await.audit() }

  /// A deep copy of the current tree.
  pub async fn snapshot(&self) -> Vec<District> {
    self.roster.read().await.districts.clone()
  }

  async fn pause(&self, op: Op) {
    let delay = self.latency.delay_for(op);
    if !delay.is_zero() {
      tracing::debug!(?op, ?delay, "simulated latency");
      tokio::time::sleep(delay).await;
    }
  }

  #[cfg(test)]
  pub(crate) async fn tamper<R>(&self, f: impl FnOnce(&mut Vec<District>) -> R) -> R {
    f(&mut self.roster.write().await.districts)
  }
}

impl RosterStore for MemoryStore {
  type Error = Error;

  // ── Hierarchy reads ───────────────────────────────────────────────────────

  async fn list_districts(&self) -> Result<Vec<District>> {
    self.pause(Op::ListDistricts).await;
    Ok(self.roster.read().await.districts.clone())
  }

  async fn get_district(&self, district_id: &str) -> Result<District> {
    self.pause(Op::GetDistrict).await;
    let roster = self.roster.read().await;
    let pos = roster.district_pos(district_id)?;
    Ok(roster.districts[pos].clone())
  }

  async fn list_schools_of(&self, district_id: &str) -> Result<Vec<School>> {
    self.pause(Op::ListSchools).await;
    let roster = self.roster.read().await;
    Ok(
      roster
        .district_pos(district_id)
        .map(|d| roster.districts[d].schools.clone())
        .unwrap_or_default(),
    )
  }

  async fn get_school(&self, school_id: &str) -> Result<SchoolView> {
    self.pause(Op::GetSchool).await;
    let roster = self.roster.read().await;
    let (district, school) = roster.school(roster.school_pos(school_id)?);
    Ok(SchoolView::project(district, school))
  }

  async fn list_teachers_of(&self, school_id: &str) -> Result<Vec<TeacherView>> {
    self.pause(Op::ListTeachers).await;
    let roster = self.roster.read().await;
    let Ok(pos) = roster.school_pos(school_id) else {
      return Ok(Vec::new());
    };
    let (district, school) = roster.school(pos);
    Ok(
      school
        .teachers
        .iter()
        .map(|t| TeacherView::project(district, school, t))
        .collect(),
    )
  }

  async fn get_teacher(&self, teacher_id: &str) -> Result<TeacherView> {
    self.pause(Op::GetTeacher).await;
    let roster = self.roster.read().await;
    let pos = roster.teacher_pos(teacher_id)?;
    let (district, school) = roster.school(SchoolPos {
      district: pos.district,
      school:   pos.school,
    });
    Ok(TeacherView::project(district, school, &school.teachers[pos.teacher]))
  }

  async fn list_courses_of(&self, teacher_id: &str) -> Result<Vec<CourseView>> {
    self.pause(Op::ListCourses).await;
    let roster = self.roster.read().await;
    let pos = roster.teacher_pos(teacher_id)?;
    let (district, school) = roster.school(SchoolPos {
      district: pos.district,
      school:   pos.school,
    });
    let teacher = &school.teachers[pos.teacher];
    Ok(
      teacher
        .courses
        .iter()
        .map(|c| CourseView::project(district, school, teacher, c))
        .collect(),
    )
  }

  async fn get_course(&self, course_id: &str) -> Result<CourseView> {
    self.pause(Op::GetCourse).await;
    let roster = self.roster.read().await;
    let pos = roster.course_pos(course_id)?;
    Ok(roster.course_view(pos))
  }

  async fn search_educators(&self, query: &str) -> Result<Vec<EducatorHit>> {
    self.pause(Op::SearchEducators).await;
    let needle = query.to_lowercase();
    let roster = self.roster.read().await;
    let hits = roster
      .districts
      .iter()
      .flat_map(|d| d.schools.iter().map(move |s| (d, s)))
      .flat_map(|(d, s)| s.teachers.iter().map(move |t| (d, s, t)))
      .filter(|(_, s, t)| EducatorHit::matches(s, t, &needle))
      .map(|(d, s, t)| EducatorHit::project(d, s, t))
      .take(MAX_SEARCH_RESULTS)
      .collect();
    Ok(hits)
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  async fn verify_course(
    &self,
    course_id: &str,
    verifying_educator: String,
  ) -> Result<Course> {
    self.pause(Op::VerifyCourse).await;
    let mut roster = self.roster.write().await;
    let pos = roster.course_pos(course_id)?;

    let course = roster.course_mut(pos);
    course.verify(verifying_educator, today());
    let course = course.clone();

    let school = roster.school_mut(pos.school());
    school.recount_courses();
    tracing::info!(
      course_id,
      school_id = %school.id,
      verified_courses = school.verified_courses,
      verifying_educator = course.verifying_educator.as_deref().unwrap_or_default(),
      "course verified"
    );
    Ok(course)
  }

  async fn unlock_course(&self, course_id: &str) -> Result<Course> {
    self.pause(Op::UnlockCourse).await;
    let mut roster = self.roster.write().await;
    let pos = roster.course_pos(course_id)?;

    let course = roster.course_mut(pos);
    course.unlock();
    let course = course.clone();

    let school = roster.school_mut(pos.school());
    school.recount_courses();
    tracing::info!(
      course_id,
      school_id = %school.id,
      verified_courses = school.verified_courses,
      "course unlocked"
    );
    Ok(course)
  }

  async fn remove_student(&self, course_id: &str, student_id: &str) -> Result<Student> {
    self.pause(Op::RemoveStudent).await;
    let mut roster = self.roster.write().await;
    let pos = roster.course_pos(course_id)?;
    let student = roster
      .course_mut(pos)
      .student_mut(student_id)
      .ok_or_else(|| Error::not_found(Entity::Student, student_id))?;

    if student.remove(today()) {
      tracing::info!(course_id, student_id, "student removed");
    } else {
      tracing::debug!(course_id, student_id, "student already removed");
    }
    Ok(student.clone())
  }

  async fn remove_all_students(&self, course_id: &str) -> Result<Vec<Student>> {
    self.pause(Op::RemoveAllStudents).await;
    let mut roster = self.roster.write().await;
    let pos = roster.course_pos(course_id)?;
    let on = today();

    let removed: Vec<Student> = roster
      .course_mut(pos)
      .students
      .iter_mut()
      .filter_map(|s| s.remove(on).then(|| s.clone()))
      .collect();
    tracing::info!(course_id, removed = removed.len(), "students removed");
    Ok(removed)
  }

  async fn restore_student(&self, course_id: &str, student_id: &str) -> Result<Student> {
    self.pause(Op::RestoreStudent).await;
    let mut roster = self.roster.write().await;
    let pos = roster.course_pos(course_id)?;
    let student = roster
      .course_mut(pos)
      .student_mut(student_id)
      .ok_or_else(|| Error::not_found(Entity::Student, student_id))?;

    if student.restore() {
      tracing::info!(course_id, student_id, "student restored");
    }
    Ok(student.clone())
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  async fn verification_statistics(&self) -> Result<VerificationStatistics> {
    self.pause(Op::VerificationStatistics).await;
    let roster = self.roster.read().await;
    let mut tally = Tally::default();
    for school in roster.districts.iter().flat_map(|d| &d.schools) {
      tally.add_school(school);
    }
    Ok(VerificationStatistics::new(tally.total_courses, tally.verified_courses))
  }

  async fn district_statistics(&self, district_id: &str) -> Result<DistrictStatistics> {
    self.pause(Op::DistrictStatistics).await;
    let roster = self.roster.read().await;
    let district = &roster.districts[roster.district_pos(district_id)?];

    let mut tally = Tally::default();
    let (mut total_teachers, mut verified_teachers) = (0, 0);
    for school in &district.schools {
      total_teachers += school.total_teachers;
      verified_teachers += school.verified_teachers;
      tally.add_school(school);
    }

    Ok(DistrictStatistics {
      district_id: district.id.clone(),
      district_name: district.name.clone(),
      total_schools: district.schools.len() as u32,
      total_teachers,
      verified_teachers,
      total_courses: tally.total_courses,
      verified_courses: tally.verified_courses,
      total_students: tally.total_students,
      removed_students: tally.removed_students,
      verification_percentage: percentage(tally.verified_courses, tally.total_courses),
    })
  }

  async fn school_statistics(&self, school_id: &str) -> Result<SchoolStatistics> {
    self.pause(Op::SchoolStatistics).await;
    let roster = self.roster.read().await;
    let (district, school) = roster.school(roster.school_pos(school_id)?);

    let mut tally = Tally::default();
    tally.add_school(school);

    Ok(SchoolStatistics {
      school_id: school.id.clone(),
      school_name: school.name.clone(),
      district_name: district.name.clone(),
      total_teachers: school.total_teachers,
      verified_teachers: school.verified_teachers,
      total_courses: tally.total_courses,
      verified_courses: tally.verified_courses,
      total_students: tally.total_students,
      removed_students: tally.removed_students,
      verification_percentage: percentage(tally.verified_courses, tally.total_courses),
    })
  }

  async fn export_roster(&self) -> Result<Vec<RosterRow>> {
    self.pause(Op::ExportRoster).await;
    let roster = self.roster.read().await;
    let mut rows = Vec::new();
    for school in roster.districts.iter().flat_map(|d| &d.schools) {
      for teacher in &school.teachers {
        for course in &teacher.courses {
          for student in &course.students {
            rows.push(RosterRow::project(school, teacher, course, student));
          }
        }
      }
    }
    tracing::info!(rows = rows.len(), "roster exported");
    Ok(rows)
  }

  // ── Periods ───────────────────────────────────────────────────────────────

  async fn current_verification_period(&self) -> Result<VerificationPeriod> {
    self.pause(Op::CurrentPeriod).await;
    self
      .roster
      .read()
      .await
      .periods
      .iter()
      .find(|p| p.status == PeriodStatus::Active)
      .cloned()
      .ok_or_else(|| Error::not_found(Entity::VerificationPeriod, "active"))
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  async fn notifications_for(&self, user_id: &str) -> Result<Vec<Notification>> {
    self.pause(Op::ListNotifications).await;
    let roster = self.roster.read().await;
    Ok(
      roster
        .notifications
        .iter()
        .filter(|n| n.user_id == user_id)
        .cloned()
        .collect(),
    )
  }

  async fn mark_notification_read(&self, notification_id: &str) -> Result<Notification> {
    self.pause(Op::MarkNotificationRead).await;
    let mut roster = self.roster.write().await;
    let notification = roster
      .notifications
      .iter_mut()
      .find(|n| n.id == notification_id)
      .ok_or_else(|| Error::not_found(Entity::Notification, notification_id))?;
    notification.read = true;
    Ok(notification.clone())
  }

  async fn mark_all_notifications_read(&self, user_id: &str) -> Result<Vec<Notification>> {
    self.pause(Op::MarkAllNotificationsRead).await;
    let mut roster = self.roster.write().await;
    let mut theirs = Vec::new();
    for notification in roster.notifications.iter_mut().filter(|n| n.user_id == user_id) {
      notification.read = true;
      theirs.push(notification.clone());
    }
    Ok(theirs)
  }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn validate_course_code(&self, code: &str) -> Result<CourseCode> {
    self.pause(Op::ValidateCourseCode).await;
    self
      .roster
      .read()
      .await
      .course_codes
      .iter()
      .find(|c| c.code == code)
      .cloned()
      .ok_or_else(|| Error::not_found(Entity::CourseCode, code))
  }

  async fn vam_eligible_courses(&self) -> Result<Vec<CourseCode>> {
    self.pause(Op::VamEligibleCourses).await;
    let roster = self.roster.read().await;
    Ok(roster.course_codes.iter().filter(|c| c.vam_eligible).cloned().collect())
  }

  async fn system_settings(&self) -> Result<serde_json::Value> {
    self.pause(Op::SystemSettings).await;
    Ok(self.roster.read().await.settings.clone())
  }
}
