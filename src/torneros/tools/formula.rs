//! Spreadsheet formulas for the computed columns.
//!
//! Rows are 1-based spreadsheet rows; the header occupies row 1 so the first
//! data row is 2.

use crate::torneros::tools::model::columns::{grades, students};

/// Name of the structured table holding the students.
pub const STUDENTS_TABLE: &str = "StudentsTable";
/// Name of the structured table holding the grades.
pub const GRADES_TABLE: &str = "GradesTable";
/// Placeholder shown when a grade row's student cannot be found.
pub const STUDENT_NOT_FOUND: &str = "Student Not Found";

/// `(minimum average, grade point)` steps, checked top-down.
pub const GPA_LADDER: [(f64, f64); 10] = [
    (96.0, 1.0),
    (94.0, 1.25),
    (91.0, 1.5),
    (89.0, 1.75),
    (86.0, 2.0),
    (83.0, 2.25),
    (80.0, 2.5),
    (77.0, 2.75),
    (75.0, 3.0),
    (70.0, 4.0),
];
/// Grade point for averages below every ladder step.
pub const FAILING_GRADE_POINT: f64 = 5.0;
/// Highest grade point that still passes.
pub const PASSING_GRADE_POINT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remarks {
    Passed,
    Failed,
}

impl Remarks {
    pub fn for_grade_point(grade_point: f64) -> Self {
        if grade_point <= PASSING_GRADE_POINT {
            Remarks::Passed
        } else {
            Remarks::Failed
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Remarks::Passed => "PASSED",
            Remarks::Failed => "FAILED",
        }
    }
}

/// Grade point for an average, evaluated the same way as [`gpa_formula`].
pub fn grade_point(average: f64) -> f64 {
    GPA_LADDER
        .iter()
        .find(|(threshold, _)| average >= *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(FAILING_GRADE_POINT)
}

/// Converts a zero-based column index into its letter name (`0` → `A`).
pub fn column_letter(index: u16) -> String {
    let mut remaining = u32::from(index) + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        let rem = (remaining - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A1-style reference to `column` on `row`.
pub fn cell_ref(column: u16, row: u32) -> String {
    format!("{}{row}", column_letter(column))
}

/// Age in whole years from the birthdate cell, blank when no birthdate.
pub fn age_formula(row: u32) -> String {
    let birthdate = cell_ref(students::BIRTHDATE, row);
    format!(r#"=IF({birthdate}="","",DATEDIF({birthdate},TODAY(),"Y"))"#)
}

/// Student name looked up from the students table through the hidden key.
pub fn grade_full_name_formula(row: u32) -> String {
    let key = cell_ref(grades::STUDENT_KEY, row);
    let name_column = students::FULL_NAME + 1;
    format!(
        r#"=IFERROR(VLOOKUP({key},{STUDENTS_TABLE},{name_column},FALSE),"{STUDENT_NOT_FOUND}")"#
    )
}

pub fn average_formula(row: u32) -> String {
    format!(
        "=AVERAGE({}:{})",
        cell_ref(grades::PRELIM, row),
        cell_ref(grades::FINALS, row)
    )
}

/// Nested `IF` chain mirroring [`GPA_LADDER`].
pub fn gpa_formula(row: u32) -> String {
    let average = cell_ref(grades::FINAL_AVERAGE, row);
    let mut formula = format_number(FAILING_GRADE_POINT);
    for (threshold, points) in GPA_LADDER.iter().rev() {
        formula = format!(
            "IF({average}>={},{},{formula})",
            format_number(*threshold),
            format_number(*points)
        );
    }
    format!("={formula}")
}

pub fn remarks_formula(row: u32) -> String {
    let gpa = cell_ref(grades::GPA, row);
    format!(
        r#"=IF({gpa}<={},"{}","{}")"#,
        format_number(PASSING_GRADE_POINT),
        Remarks::Passed.label(),
        Remarks::Failed.label()
    )
}

/// Conditional-format rule matching rows whose remarks equal `remarks`.
///
/// The column is absolute and the row relative so each row follows its own
/// remarks cell.
pub fn remarks_rule(remarks: Remarks, first_row: u32) -> String {
    format!(
        r#"=${}{first_row}="{}""#,
        column_letter(grades::REMARKS),
        remarks.label()
    )
}

/// Last spreadsheet row of a table with `data_len` data rows. Tables always
/// span at least one data row.
pub fn last_table_row(data_len: usize) -> u32 {
    let data_len = u32::try_from(data_len).unwrap_or(u32::MAX - 1);
    (data_len + 1).max(2)
}

/// `A1:<last column><last row>` range of a table.
pub fn table_range(last_column: u16, data_len: usize) -> String {
    format!("A1:{}", cell_ref(last_column, last_table_row(data_len)))
}

fn format_number(value: f64) -> String {
    value.to_string()
}
