use std::path::PathBuf;

use serde::Serialize;

pub mod columns;

/// A single cell read from a source workbook.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Cell without content.
    #[default]
    Empty,
    /// Plain string content.
    Text(String),
    /// Numeric content.
    Number(f64),
    /// Boolean content.
    Bool(bool),
    /// Date or date-time content expressed as a spreadsheet serial number.
    Date(f64),
}

impl CellValue {
    /// Returns `true` for empty cells and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }

    /// Textual form of the cell used when it acts as an identifier.
    ///
    /// Numbers render without a fractional part when they are integral so a
    /// numeric `1001` and the string `"1001"` produce the same key. Empty
    /// cells, zero and `false` have no key.
    pub fn key_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(value) | CellValue::Date(value) => {
                (*value != 0.0).then(|| value.to_string())
            }
            CellValue::Bool(value) => value.then(|| value.to_string()),
        }
    }

    /// Numeric content, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) | CellValue::Date(value) => Some(*value),
            _ => None,
        }
    }
}

/// First sheet of a source workbook: the header row and every row below it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceTable {
    pub headers: Vec<CellValue>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SourceTable {
    pub fn new(headers: Vec<CellValue>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }
}

/// Normalised gender. Unrecognised values are represented by `None` at the
/// use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Canonical student record written to the `Students` sheet.
///
/// The age column is not part of the record; it is always emitted as a
/// formula over the birthdate cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: String,
    pub full_name: String,
    pub gender: Option<Gender>,
    pub birthdate: CellValue,
    pub course: Option<String>,
    pub contact_number: String,
    pub email: String,
}

/// Canonical grade record written to the `Grades` sheet.
///
/// Full name, average, GPA and remarks are emitted as formulas and are
/// therefore absent here.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    /// Synthetic id of the owning student.
    pub student_key: String,
    pub subject_name: String,
    pub prelim: CellValue,
    pub midterm: CellValue,
    pub prefinal: CellValue,
    pub finals: CellValue,
    pub school_year: CellValue,
    pub semester: CellValue,
}

impl Grade {
    /// The four term scores in column order.
    pub fn scores(&self) -> [&CellValue; 4] {
        [&self.prelim, &self.midterm, &self.prefinal, &self.finals]
    }

    /// Mean of the numeric scores, ignoring non-numeric cells the way the
    /// spreadsheet `AVERAGE` function does.
    pub fn score_average(&self) -> Option<f64> {
        let numbers: Vec<f64> = self
            .scores()
            .iter()
            .filter_map(|cell| cell.as_number())
            .collect();
        if numbers.is_empty() {
            None
        } else {
            Some(numbers.iter().sum::<f64>() / numbers.len() as f64)
        }
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    pub students_written: usize,
    pub grades_written: usize,
    pub student_rows_skipped: usize,
    pub grade_rows_skipped: usize,
    /// Grade rows whose student reference did not resolve.
    pub grade_rows_dropped: usize,
    /// Students whose source id was missing or duplicated.
    pub generated_ids: usize,
    pub projected_passed: usize,
    pub projected_failed: usize,
}
