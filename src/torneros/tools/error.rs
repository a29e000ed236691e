use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests, merges, or emits the student workbooks.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the run summary cannot be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a source workbook does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised before any processing when one or more source files are absent.
    #[error("missing input file(s): {}", display_paths(.0))]
    MissingInputs(Vec<PathBuf>),

    /// Raised when a configuration value cannot be honoured.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when no unused identifier of the configured width can be drawn.
    #[error("no unused {digits}-digit identifier found after {attempts} attempts")]
    IdentifierSpaceExhausted { digits: u32, attempts: usize },

    /// Raised when no unused contact number can be drawn.
    #[error("no unused contact number found after {attempts} attempts")]
    ContactSpaceExhausted { attempts: usize },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
