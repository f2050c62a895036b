//! Verification periods and the window resolver.
//!
//! A period defines two date ranges: a view-only window in which rosters can
//! be inspected, and a verification window in which they can be edited. The
//! window in effect is recomputed from the clock on every call.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which window a point in time falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodWindow {
  ViewOnly,
  Verification,
  Closed,
}

impl PeriodWindow {
  /// Only the verification window permits roster edits.
  pub fn allows_edits(self) -> bool { matches!(self, Self::Verification) }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::ViewOnly => "view-only",
      Self::Verification => "verification",
      Self::Closed => "closed",
    }
  }
}

impl fmt::Display for PeriodWindow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Resolve the window for `now`. Bounds are inclusive and the view-only range
/// is checked first, so overlapping ranges resolve to view-only.
pub fn resolve(
  now: DateTime<Utc>,
  view_only_start: DateTime<Utc>,
  view_only_end: DateTime<Utc>,
  verification_start: DateTime<Utc>,
  verification_end: DateTime<Utc>,
) -> PeriodWindow {
  if view_only_start <= now && now <= view_only_end {
    PeriodWindow::ViewOnly
  } else if verification_start <= now && now <= verification_end {
    PeriodWindow::Verification
  } else {
    PeriodWindow::Closed
  }
}

/// Record status of a configured period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
  Active,
  Upcoming,
  Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPeriod {
  pub id:                 String,
  pub name:               String,
  pub status:             PeriodStatus,
  pub view_only_start:    DateTime<Utc>,
  pub view_only_end:      DateTime<Utc>,
  pub verification_start: DateTime<Utc>,
  pub verification_end:   DateTime<Utc>,
}

impl VerificationPeriod {
  pub fn window_at(&self, now: DateTime<Utc>) -> PeriodWindow {
    resolve(
      now,
      self.view_only_start,
      self.view_only_end,
      self.verification_start,
      self.verification_end,
    )
  }
}
