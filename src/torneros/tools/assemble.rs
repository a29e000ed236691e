//! Builds an in-memory description of the unified workbook: cell contents,
//! structured tables, validation, fills and conditional formats.

use crate::torneros::tools::formula::{self, GRADES_TABLE, Remarks, STUDENTS_TABLE};
use crate::torneros::tools::model::columns::{grades, students};
use crate::torneros::tools::model::{CellValue, Gender, Grade, Student};

pub const STUDENTS_SHEET: &str = "Students";
pub const GRADES_SHEET: &str = "Grades";
/// Last row covered by the gender dropdown, well past the emitted data so
/// rows added by hand are validated too.
pub const DEFAULT_GENDER_VALIDATION_LAST_ROW: u32 = 5000;

pub const ID_FILL: u32 = 0xD9D9D9;
pub const COMPUTED_FILL: u32 = 0xE6D6FF;
pub const GENDER_FILL: u32 = 0xDBEAFE;
pub const PASSED_FILL: u32 = 0xC6EFCE;
pub const FAILED_FILL: u32 = 0xFFC7CE;

/// Spreadsheet number format forcing text entry.
pub const TEXT_FORMAT: &str = "@";
pub const DATE_FORMAT: &str = "yyyy-mm-dd";

/// Value written into a single output cell.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputCell {
    Blank,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Spreadsheet date serial number.
    Date(f64),
    /// Live formula, including the leading `=`.
    Formula(String),
}

impl From<&CellValue> for OutputCell {
    fn from(value: &CellValue) -> Self {
        match value {
            CellValue::Empty => OutputCell::Blank,
            CellValue::Text(text) => OutputCell::Text(text.clone()),
            CellValue::Number(number) => OutputCell::Number(*number),
            CellValue::Bool(flag) => OutputCell::Bool(*flag),
            CellValue::Date(serial) => OutputCell::Date(*serial),
        }
    }
}

impl From<Option<String>> for OutputCell {
    fn from(value: Option<String>) -> Self {
        value.map_or(OutputCell::Blank, OutputCell::Text)
    }
}

/// Presentation of one output column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub header: String,
    /// Solid fill applied to the header and every data row.
    pub fill: Option<u32>,
    /// Data cells use the text number format.
    pub text: bool,
    pub hidden: bool,
}

impl ColumnSpec {
    fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            fill: None,
            text: false,
            hidden: false,
        }
    }
}

/// Structured table registered over the top-left block of a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub name: String,
    pub last_column: u16,
    /// Last spreadsheet row (1-based) of the table, header included.
    pub last_row: u32,
    pub banded_rows: bool,
    pub first_column: bool,
    pub last_column_emphasis: bool,
}

impl TableSpec {
    pub fn range(&self) -> String {
        format!("A1:{}", formula::cell_ref(self.last_column, self.last_row))
    }
}

/// Dropdown restricting a column to a fixed list of values.
#[derive(Debug, Clone, PartialEq)]
pub struct ListValidation {
    pub column: u16,
    pub first_row: u32,
    pub last_row: u32,
    pub values: Vec<String>,
    pub allow_blank: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalRule {
    pub formula: String,
    pub fill: u32,
    pub stop_if_true: bool,
}

/// Conditional rules applied, in order, to one column over a row span.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalRange {
    pub column: u16,
    pub first_row: u32,
    pub last_row: u32,
    pub rules: Vec<ConditionalRule>,
}

/// A sheet that will be materialised in the output workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub sheet_name: String,
    pub columns: Vec<ColumnSpec>,
    /// Data rows, starting at spreadsheet row 2.
    pub rows: Vec<Vec<OutputCell>>,
    pub table: TableSpec,
    pub validations: Vec<ListValidation>,
    pub conditional_formats: Vec<ConditionalRange>,
}

impl SheetLayout {
    /// Last spreadsheet row receiving column fills: the header plus data rows.
    pub fn fill_last_row(&self) -> u32 {
        self.rows.len() as u32 + 1
    }

    pub fn cell(&self, row: u32, column: u16) -> Option<&OutputCell> {
        let index = usize::try_from(row.checked_sub(2)?).ok()?;
        self.rows.get(index)?.get(usize::from(column))
    }
}

/// Complete description of the unified workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub sheets: Vec<SheetLayout>,
}

impl WorkbookData {
    pub fn sheet(&self, name: &str) -> Option<&SheetLayout> {
        self.sheets.iter().find(|sheet| sheet.sheet_name == name)
    }
}

/// Lays out both sheets for the given records.
pub fn build_workbook(
    students: &[Student],
    grades: &[Grade],
    gender_validation_last_row: u32,
) -> WorkbookData {
    WorkbookData {
        sheets: vec![
            students_sheet(students, gender_validation_last_row),
            grades_sheet(grades),
        ],
    }
}

fn students_sheet(records: &[Student], gender_validation_last_row: u32) -> SheetLayout {
    let mut columns: Vec<ColumnSpec> = students::HEADERS
        .iter()
        .map(|header| ColumnSpec::new(header))
        .collect();
    columns[usize::from(students::ID)].fill = Some(ID_FILL);
    columns[usize::from(students::ID)].text = true;
    columns[usize::from(students::AGE)].fill = Some(ID_FILL);
    columns[usize::from(students::GENDER)].fill = Some(GENDER_FILL);

    let rows = records
        .iter()
        .zip(2_u32..)
        .map(|(student, row)| {
            vec![
                OutputCell::Text(student.id.clone()),
                OutputCell::Text(student.full_name.clone()),
                student.gender.map(|gender| gender.label().to_string()).into(),
                OutputCell::from(&student.birthdate),
                OutputCell::Formula(formula::age_formula(row)),
                student.course.clone().into(),
                OutputCell::Text(student.contact_number.clone()),
                OutputCell::Text(student.email.clone()),
            ]
        })
        .collect();

    SheetLayout {
        sheet_name: STUDENTS_SHEET.to_string(),
        columns,
        rows,
        table: table_spec(STUDENTS_TABLE, students::TABLE_LAST, records.len()),
        validations: vec![ListValidation {
            column: students::GENDER,
            first_row: 2,
            last_row: gender_validation_last_row.max(2),
            values: Gender::ALL
                .iter()
                .map(|gender| gender.label().to_string())
                .collect(),
            allow_blank: true,
        }],
        conditional_formats: Vec::new(),
    }
}

fn grades_sheet(records: &[Grade]) -> SheetLayout {
    let mut columns: Vec<ColumnSpec> = grades::HEADERS
        .iter()
        .map(|header| ColumnSpec::new(header))
        .collect();
    columns[usize::from(grades::FINAL_AVERAGE)].fill = Some(COMPUTED_FILL);
    columns[usize::from(grades::GPA)].fill = Some(COMPUTED_FILL);
    columns[usize::from(grades::STUDENT_KEY)].text = true;
    columns[usize::from(grades::STUDENT_KEY)].hidden = true;

    let rows = records
        .iter()
        .zip(2_u32..)
        .map(|(grade, row)| {
            vec![
                OutputCell::Formula(formula::grade_full_name_formula(row)),
                OutputCell::Text(grade.subject_name.clone()),
                OutputCell::from(&grade.prelim),
                OutputCell::from(&grade.midterm),
                OutputCell::from(&grade.prefinal),
                OutputCell::from(&grade.finals),
                OutputCell::Formula(formula::average_formula(row)),
                OutputCell::Formula(formula::gpa_formula(row)),
                OutputCell::Formula(formula::remarks_formula(row)),
                OutputCell::from(&grade.school_year),
                OutputCell::from(&grade.semester),
                OutputCell::Text(grade.student_key.clone()),
            ]
        })
        .collect();

    let table = table_spec(GRADES_TABLE, grades::TABLE_LAST, records.len());
    let pass_fail_rules = vec![
        ConditionalRule {
            formula: formula::remarks_rule(Remarks::Passed, 2),
            fill: PASSED_FILL,
            stop_if_true: true,
        },
        ConditionalRule {
            formula: formula::remarks_rule(Remarks::Failed, 2),
            fill: FAILED_FILL,
            stop_if_true: true,
        },
    ];
    let conditional_formats = [grades::REMARKS, grades::SCHOOL_YEAR, grades::SEMESTER]
        .into_iter()
        .map(|column| ConditionalRange {
            column,
            first_row: 2,
            last_row: table.last_row,
            rules: pass_fail_rules.clone(),
        })
        .collect();

    SheetLayout {
        sheet_name: GRADES_SHEET.to_string(),
        columns,
        rows,
        table,
        validations: Vec::new(),
        conditional_formats,
    }
}

fn table_spec(name: &str, last_column: u16, data_len: usize) -> TableSpec {
    TableSpec {
        name: name.to_string(),
        last_column,
        last_row: formula::last_table_row(data_len),
        banded_rows: true,
        first_column: false,
        last_column_emphasis: false,
    }
}
