//! Error types for `roster-core`.

use std::fmt;

use thiserror::Error;

/// The kind of record a lookup was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
  District,
  School,
  Teacher,
  Course,
  Student,
  Notification,
  VerificationPeriod,
  CourseCode,
}

impl fmt::Display for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::District => "district",
      Self::School => "school",
      Self::Teacher => "teacher",
      Self::Course => "course",
      Self::Student => "student",
      Self::Notification => "notification",
      Self::VerificationPeriod => "verification period",
      Self::CourseCode => "course code",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{entity} not found: {id}")]
  NotFound { entity: Entity, id: String },

  #[error("schema error: {0}")]
  Schema(String),

  #[error("invariant violation: {0}")]
  InvariantViolation(String),

  #[error("validation error: {0}")]
  Validation(String),
}

impl Error {
  pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
    Self::NotFound { entity, id: id.into() }
  }

  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
