//! Simulated round-trip latency.
//!
//! The portal's screens were designed against a backend with noticeable
//! response times. A [`LatencyProfile::Simulated`] store sleeps for each
//! operation's nominal delay before touching the tree.

use std::time::Duration;

/// Longest simulated delay for a single operation, whatever the scale.
pub const MAX_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LatencyProfile {
  /// Operations resolve immediately.
  #[default]
  Disabled,
  /// Operations sleep for their nominal delay multiplied by `scale`, capped
  /// at [`MAX_DELAY`]. A negative or NaN scale means no delay.
  Simulated { scale: f64 },
}

impl LatencyProfile {
  pub fn delay_for(self, op: Op) -> Duration {
    match self {
      Self::Disabled => Duration::ZERO,
      Self::Simulated { scale } => {
        let nominal = op.nominal_delay();
        let secs = nominal.as_secs_f64() * scale;
        if secs.is_nan() || secs <= 0.0 {
          Duration::ZERO
        } else if secs >= MAX_DELAY.as_secs_f64() {
          MAX_DELAY
        } else {
          nominal.mul_f64(scale)
        }
      }
    }
  }
}

/// Store operations, for latency lookup and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  ListDistricts,
  GetDistrict,
  ListSchools,
  GetSchool,
  ListTeachers,
  GetTeacher,
  ListCourses,
  GetCourse,
  SearchEducators,
  VerifyCourse,
  UnlockCourse,
  RemoveStudent,
  RemoveAllStudents,
  RestoreStudent,
  VerificationStatistics,
  DistrictStatistics,
  SchoolStatistics,
  ExportRoster,
  CurrentPeriod,
  ListNotifications,
  MarkNotificationRead,
  MarkAllNotificationsRead,
  ValidateCourseCode,
  VamEligibleCourses,
  SystemSettings,
}

impl Op {
  pub fn nominal_delay(self) -> Duration {
    let ms = match self {
      Self::CurrentPeriod | Self::SystemSettings | Self::ValidateCourseCode => 100,
      Self::GetDistrict
      | Self::GetSchool
      | Self::GetTeacher
      | Self::GetCourse
      | Self::VerificationStatistics
      | Self::MarkNotificationRead
      | Self::VamEligibleCourses => 200,
      Self::ListDistricts
      | Self::ListSchools
      | Self::ListCourses
      | Self::SchoolStatistics
      | Self::ListNotifications => 300,
      Self::ListTeachers | Self::SearchEducators | Self::MarkAllNotificationsRead => {
        400
      }
      Self::RemoveStudent | Self::RestoreStudent | Self::DistrictStatistics => 500,
      Self::UnlockCourse => 600,
      Self::VerifyCourse | Self::RemoveAllStudents => 800,
      Self::ExportRoster => 1500,
    };
    Duration::from_millis(ms)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn disabled_profile_never_waits() {
    assert_eq!(LatencyProfile::Disabled.delay_for(Op::ExportRoster), Duration::ZERO);
  }

  #[test]
  fn simulated_profile_scales_nominal_delay() {
    let half = LatencyProfile::Simulated { scale: 0.5 };
    assert_eq!(half.delay_for(Op::VerifyCourse), Duration::from_millis(400));
    assert_eq!(half.delay_for(Op::ExportRoster), Duration::from_millis(750));
  }

  #[test]
  fn negative_scale_is_clamped() {
    let odd = LatencyProfile::Simulated { scale: -2.0 };
    assert_eq!(odd.delay_for(Op::GetCourse), Duration::ZERO);
  }

  #[test]
  fn unbounded_scale_is_capped() {
    let huge = LatencyProfile::Simulated { scale: 1e30 };
    assert_eq!(huge.delay_for(Op::ExportRoster), MAX_DELAY);
    let infinite = LatencyProfile::Simulated { scale: f64::INFINITY };
    assert_eq!(infinite.delay_for(Op::GetCourse), MAX_DELAY);
  }

  #[test]
  fn nan_scale_never_waits() {
    let nan = LatencyProfile::Simulated { scale: f64::NAN };
    assert_eq!(nan.delay_for(Op::VerifyCourse), Duration::ZERO);
    let neg_inf = LatencyProfile::Simulated { scale: f64::NEG_INFINITY };
    assert_eq!(neg_inf.delay_for(Op::VerifyCourse), Duration::ZERO);
  }
}
