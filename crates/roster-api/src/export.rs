//! CSV rendering of the roster export.

use std::io;

use roster_core::stats::RosterRow;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Write `rows` as CSV with a header row naming the export columns.
pub fn write_csv<W: io::Write>(rows: &[RosterRow], out: W) -> Result<(), csv::Error> {
  let mut writer = csv::Writer::from_writer(out);
  if rows.is_empty() {
    writer.write_record(HEADER)?;
  }
  for row in rows {
    writer.serialize(row)?;
  }
  writer.flush()?;
  Ok(())
}

/// Render `rows` into an in-memory CSV document.
pub fn to_csv(rows: &[RosterRow]) -> Result<Vec<u8>, csv::Error> {
  let mut buf = Vec::new();
  write_csv(rows, &mut buf)?;
  Ok(buf)
}

/// Column names, for the header of an empty export; `serialize` derives the
/// same header from [`RosterRow`] otherwise.
const HEADER: [&str; 15] = [
  "SchoolCd",
  "SchoolName",
  "CourseCode",
  "SectionNumber",
  "EducatorName",
  "VerifiedDate",
  "VerifyingEducator",
  "StudentIdNumber",
  "FirstName",
  "LastName",
  "BirthDay",
  "GradeCode",
  "Removed",
  "EnrollmentDate",
  "Absences",
];

#[cfg(test)]
mod tests {
  use super::*;

  fn row(removed: &str) -> RosterRow {
    RosterRow {
      school_code:        "009012".into(),
      school_name:        "Captain Shreve High School".into(),
      course_code:        "160301".into(),
      section_number:     "01".into(),
      educator_name:      "Maria Thibodeaux".into(),
      verified_date:      String::new(),
      verifying_educator: String::new(),
      student_id_number:  "2104418833".into(),
      first_name:         "Jalen".into(),
      last_name:          "Robichaux".into(),
      birth_day:          "2010-04-02".into(),
      grade_code:         "09".into(),
      removed:            removed.into(),
      enrollment_date:    "2025-08-11".into(),
      absences:           3,
    }
  }

  #[test]
  fn header_then_one_line_per_row() {
    let csv = String::from_utf8(to_csv(&[row(""), row("2025-10-06")]).unwrap()).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], HEADER.join(","));
    assert_eq!(
      lines[1],
      "009012,Captain Shreve High School,160301,01,Maria Thibodeaux,,,2104418833,Jalen,Robichaux,2010-04-02,09,,2025-08-11,3"
    );
    assert!(lines[2].contains(",2025-10-06,"));
  }

  #[test]
  fn empty_export_still_has_header() {
    let csv = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
    assert_eq!(csv.trim_end(), HEADER.join(","));
  }
}
