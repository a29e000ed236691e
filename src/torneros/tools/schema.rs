use std::collections::HashMap;

use crate::torneros::tools::model::CellValue;

/// Header labels read from the Students source.
pub mod student_fields {
    pub const ID_CODE: &str = "idCode";
    pub const GENDER: &str = "gender";
    pub const BIRTHDATE: &str = "birthdate";
    pub const SECTION: &str = "section";
}

/// Header labels read from the Grades source.
pub mod grade_fields {
    pub const STUDENT_ID_CODE: &str = "studentIdCode";
    pub const PRELIM: &str = "prelim";
    pub const MIDTERM: &str = "midterm";
    pub const PREFINAL: &str = "prefinal";
    pub const FINALS: &str = "finals";
    pub const SCHOOL_YEAR: &str = "schoolYear";
    pub const SEMESTER: &str = "semester";
}

/// Maps header labels to zero-based column positions so fields can be read
/// regardless of the source column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Builds the index from a header row. Empty header cells are skipped and
    /// a repeated label resolves to its last occurrence.
    pub fn from_headers(headers: &[CellValue]) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .filter_map(|(position, cell)| header_label(cell).map(|label| (label, position)))
            .collect();
        Self { positions }
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Reads the cell under `label`, or `None` when the header is absent or
    /// the row is shorter than the header.
    pub fn get<'a>(&self, row: &'a [CellValue], label: &str) -> Option<&'a CellValue> {
        self.position(label).and_then(|position| row.get(position))
    }

    /// Like [`HeaderIndex::get`] but falling back to `default`.
    pub fn get_or<'a>(
        &self,
        row: &'a [CellValue],
        label: &str,
        default: &'a CellValue,
    ) -> &'a CellValue {
        self.get(row, label).unwrap_or(default)
    }

    /// Clones the cell under `label`, yielding [`CellValue::Empty`] when the
    /// field is missing.
    pub fn value(&self, row: &[CellValue], label: &str) -> CellValue {
        self.get(row, label).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn header_label(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Empty => None,
        CellValue::Text(value) if value.is_empty() => None,
        CellValue::Text(value) => Some(value.clone()),
        CellValue::Number(value) | CellValue::Date(value) => Some(value.to_string()),
        CellValue::Bool(value) => Some(value.to_string()),
    }
}
