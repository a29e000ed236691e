use rand::Rng;
use tracing::debug;

use crate::torneros::tools::error::Result;
use crate::torneros::tools::model::{CellValue, Gender, Grade, SourceTable, Student};
use crate::torneros::tools::reconcile::IdentifierReconciler;
use crate::torneros::tools::schema::{HeaderIndex, grade_fields, student_fields};
use crate::torneros::tools::synth::{self, ContactRegistry, NamePool};

/// Records produced from one source sheet along with per-row bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    /// Rows whose every cell was empty.
    pub skipped_empty: usize,
    /// Rows discarded because their student reference did not resolve.
    pub dropped_unresolved: usize,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped_empty: 0,
            dropped_unresolved: 0,
        }
    }
}

/// Uniqueness state shared by every student of a run.
#[derive(Debug, Clone)]
pub struct StudentState {
    pub reconciler: IdentifierReconciler,
    pub names: NamePool,
    pub contacts: ContactRegistry,
}

impl StudentState {
    pub fn new(id_digits: u32) -> Result<Self> {
        Ok(Self {
            reconciler: IdentifierReconciler::new(id_digits)?,
            names: NamePool::new(),
            contacts: ContactRegistry::new(),
        })
    }
}

/// Maps the Students source into canonical student records, registering every
/// source id with the reconciler held by `state`.
pub fn normalize_students<R: Rng + ?Sized>(
    source: &SourceTable,
    state: &mut StudentState,
    rng: &mut R,
) -> Result<Normalized<Student>> {
    let index = HeaderIndex::from_headers(&source.headers);
    let mut normalized = Normalized::default();

    for row in &source.rows {
        if is_blank_row(row) {
            normalized.skipped_empty += 1;
            continue;
        }

        let raw_id = index
            .get(row, student_fields::ID_CODE)
            .and_then(CellValue::key_text);
        let id = state.reconciler.reconcile(raw_id.as_deref(), rng)?;
        let full_name = state.names.next_name();
        let gender = index
            .get(row, student_fields::GENDER)
            .and_then(normalize_gender);
        let birthdate = index.value(row, student_fields::BIRTHDATE);
        let course = index
            .get(row, student_fields::SECTION)
            .and_then(course_from_section);
        let contact_number = state.contacts.next_contact(rng)?;
        let email = synth::email_for(&id);

        normalized.records.push(Student {
            id,
            full_name,
            gender,
            birthdate,
            course,
            contact_number,
            email,
        });
    }

    Ok(normalized)
}

/// Maps the Grades source into grade records keyed by synthetic student id.
/// Rows referencing an unknown student are dropped.
pub fn normalize_grades<R: Rng + ?Sized>(
    source: &SourceTable,
    reconciler: &IdentifierReconciler,
    rng: &mut R,
) -> Normalized<Grade> {
    let index = HeaderIndex::from_headers(&source.headers);
    let mut normalized = Normalized::default();

    for (offset, row) in source.rows.iter().enumerate() {
        if is_blank_row(row) {
            normalized.skipped_empty += 1;
            continue;
        }

        let student_key = index
            .get(row, grade_fields::STUDENT_ID_CODE)
            .and_then(CellValue::key_text)
            .and_then(|raw| reconciler.resolve(&raw).map(str::to_string));
        let Some(student_key) = student_key else {
            debug!(source_row = offset + 2, "dropping grade row without a known student");
            normalized.dropped_unresolved += 1;
            continue;
        };

        normalized.records.push(Grade {
            student_key,
            subject_name: synth::pick_subject(rng).to_string(),
            prelim: index.value(row, grade_fields::PRELIM),
            midterm: index.value(row, grade_fields::MIDTERM),
            prefinal: index.value(row, grade_fields::PREFINAL),
            finals: index.value(row, grade_fields::FINALS),
            school_year: index.value(row, grade_fields::SCHOOL_YEAR),
            semester: index.value(row, grade_fields::SEMESTER),
        });
    }

    normalized
}

/// Recognises `male`/`female` in any case and the numeric codes 1 and 2.
/// Booleans count as numeric codes, so `true` reads as 1.
pub fn normalize_gender(value: &CellValue) -> Option<Gender> {
    match value {
        CellValue::Text(text) => match text.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        },
        CellValue::Number(code) => match code.trunc() as i64 {
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        },
        CellValue::Bool(true) => Some(Gender::Male),
        _ => None,
    }
}

/// Course part of a section such as `BSIT - 2A`, i.e. everything before the
/// first `-`, trimmed.
pub fn course_from_section(value: &CellValue) -> Option<String> {
    let section = value.key_text()?;
    let course = section.split('-').next().unwrap_or_default().trim();
    (!course.is_empty()).then(|| course.to_string())
}

fn is_blank_row(row: &[CellValue]) -> bool {
    row.iter().all(CellValue::is_empty)
}
