use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::torneros::tools::assemble::build_workbook;
use crate::torneros::tools::config::MergeConfig;
use crate::torneros::tools::error::{Result, ToolError};
use crate::torneros::tools::formula::{Remarks, grade_point};
use crate::torneros::tools::io::{excel_read, excel_write};
use crate::torneros::tools::model::{Grade, RunSummary, SourceTable, Student};
use crate::torneros::tools::normalize::{self, StudentState};

/// Students and grades after reconciliation, ready to be laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDataset {
    pub students: Vec<Student>,
    pub grades: Vec<Grade>,
    pub summary: RunSummary,
}

/// Reads both sources, merges them, and writes the unified workbook.
#[instrument(
    level = "info",
    skip_all,
    fields(
        students = %config.students_path.display(),
        grades = %config.grades_path.display(),
        output = %config.output_path.display()
    )
)]
pub fn run(config: &MergeConfig) -> Result<RunSummary> {
    ensure_inputs_exist(&[config.students_path.as_path(), config.grades_path.as_path()])?;

    let students_source = excel_read::read_source(&config.students_path)?;
    let grades_source = excel_read::read_source(&config.grades_path)?;
    info!(
        student_rows = students_source.rows.len(),
        grade_rows = grades_source.rows.len(),
        "read source workbooks"
    );

    let mut rng = config.rng();
    let merged = merge_sources(&students_source, &grades_source, config.id_digits, &mut rng)?;

    let workbook = build_workbook(
        &merged.students,
        &merged.grades,
        config.gender_validation_last_row,
    );
    debug!(sheet_count = workbook.sheets.len(), "workbook constructed");
    excel_write::write_workbook(&config.output_path, &workbook)?;

    let summary = RunSummary {
        output: config.output_path.clone(),
        ..merged.summary
    };
    info!(
        students = summary.students_written,
        grades = summary.grades_written,
        dropped = summary.grade_rows_dropped,
        "unified workbook written"
    );
    Ok(summary)
}

/// Fails with every missing path when any input is absent.
pub fn ensure_inputs_exist(paths: &[&Path]) -> Result<()> {
    let missing: Vec<PathBuf> = paths
        .iter()
        .filter(|path| !path.exists())
        .map(|path| path.to_path_buf())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ToolError::MissingInputs(missing))
    }
}

/// Reconciles the two sources into students and grades that reference them.
#[instrument(level = "debug", skip_all, fields(id_digits = id_digits))]
pub fn merge_sources<R: Rng + ?Sized>(
    students_source: &SourceTable,
    grades_source: &SourceTable,
    id_digits: u32,
    rng: &mut R,
) -> Result<MergedDataset> {
    let mut state = StudentState::new(id_digits)?;
    let students = normalize::normalize_students(students_source, &mut state, rng)?;
    let grades = normalize::normalize_grades(grades_source, &state.reconciler, rng);
    debug!(
        students = students.records.len(),
        grades = grades.records.len(),
        "sources normalised"
    );

    let (projected_passed, projected_failed) = project_remarks(&grades.records);
    let summary = RunSummary {
        output: PathBuf::new(),
        students_written: students.records.len(),
        grades_written: grades.records.len(),
        student_rows_skipped: students.skipped_empty,
        grade_rows_skipped: grades.skipped_empty,
        grade_rows_dropped: grades.dropped_unresolved,
        generated_ids: state.reconciler.generated_count(),
        projected_passed,
        projected_failed,
    };

    Ok(MergedDataset {
        students: students.records,
        grades: grades.records,
        summary,
    })
}

/// Pass/fail tally the workbook formulas will show for rows with numeric
/// scores.
fn project_remarks(grades: &[Grade]) -> (usize, usize) {
    grades
        .iter()
        .filter_map(Grade::score_average)
        .map(|average| Remarks::for_grade_point(grade_point(average)))
        .fold((0, 0), |(passed, failed), remarks| match remarks {
            Remarks::Passed => (passed + 1, failed),
            Remarks::Failed => (passed, failed + 1),
        })
}
