use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::torneros::tools::assemble::DEFAULT_GENDER_VALIDATION_LAST_ROW;
use crate::torneros::tools::reconcile::DEFAULT_ID_DIGITS;

pub const STUDENTS_FILE: &str = "Students_Report.xlsx";
pub const GRADES_FILE: &str = "Grades_Report.xlsx";
pub const OUTPUT_FILE: &str = "Unified_Student_System.xlsx";

/// Settings for one merge run. The defaults are the fixed file names in the
/// working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    pub students_path: PathBuf,
    pub grades_path: PathBuf,
    pub output_path: PathBuf,
    /// Width of generated student identifiers.
    pub id_digits: u32,
    /// Last spreadsheet row covered by the gender dropdown.
    pub gender_validation_last_row: u32,
    /// Fixed seed for reproducible synthetic values.
    pub seed: Option<u64>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            students_path: PathBuf::from(STUDENTS_FILE),
            grades_path: PathBuf::from(GRADES_FILE),
            output_path: PathBuf::from(OUTPUT_FILE),
            id_digits: DEFAULT_ID_DIGITS,
            gender_validation_last_row: DEFAULT_GENDER_VALIDATION_LAST_ROW,
            seed: None,
        }
    }
}

impl MergeConfig {
    /// Random source for the run, seeded when [`MergeConfig::seed`] is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
