//! Id → tree-position index.
//!
//! Built once at load. The tree is never structurally modified, so positions
//! remain valid for the lifetime of the store.

use std::collections::HashMap;

use roster_core::model::District;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SchoolPos {
  pub district: usize,
  pub school:   usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TeacherPos {
  pub district: usize,
  pub school:   usize,
  pub teacher:  usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CoursePos {
  pub district: usize,
  pub school:   usize,
  pub teacher:  usize,
  pub course:   usize,
}

impl CoursePos {
  pub fn school(self) -> SchoolPos {
    SchoolPos { district: self.district, school: self.school }
  }
}

#[derive(Debug, Default)]
pub(crate) struct Index {
  pub districts: HashMap<String, usize>,
  pub schools:   HashMap<String, SchoolPos>,
  pub teachers:  HashMap<String, TeacherPos>,
  pub courses:   HashMap<String, CoursePos>,
}

impl Index {
  pub fn build(districts: &[District]) -> Self {
    let mut index = Self::default();
    for (d, district) in districts.iter().enumerate() {
      index.districts.insert(district.id.clone(), d);
      for (s, school) in district.schools.iter().enumerate() {
        index
          .schools
          .insert(school.id.clone(), SchoolPos { district: d, school: s });
        for (t, teacher) in school.teachers.iter().enumerate() {
          index.teachers.insert(teacher.id.clone(), TeacherPos {
            district: d,
            school:   s,
            teacher:  t,
          });
          for (c, course) in teacher.courses.iter().enumerate() {
            index.courses.insert(course.id.clone(), CoursePos {
              district: d,
              school:   s,
              teacher:  t,
              course:   c,
            });
          }
        }
      }
    }
    index
  }
}
