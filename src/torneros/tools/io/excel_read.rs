use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::torneros::tools::error::{Result, ToolError};
use crate::torneros::tools::model::{CellValue, SourceTable};

/// Reads the first sheet of an `.xlsx` workbook. The first row becomes the
/// header row; every following row is returned as-is, empty rows included.
pub fn read_source(path: &Path) -> Result<SourceTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            ToolError::InvalidWorkbook(format!("'{}' contains no worksheet", path.display()))
        })?
        .map_err(ToolError::from)?;

    let mut rows = range.rows();
    let headers: Vec<CellValue> = rows
        .next()
        .map(|row| row.iter().map(cell_value).collect())
        .unwrap_or_default();
    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    debug!(path = %path.display(), row_count = rows.len(), "read source sheet");
    Ok(SourceTable::new(headers, rows))
}

fn cell_value(cell: &DataType) -> CellValue {
    match cell {
        DataType::Empty => CellValue::Empty,
        DataType::String(value) => CellValue::Text(value.clone()),
        DataType::Float(value) => CellValue::Number(*value),
        DataType::Int(value) => CellValue::Number(*value as f64),
        DataType::Bool(value) => CellValue::Bool(*value),
        DataType::DateTime(serial) => CellValue::Date(*serial),
        other => CellValue::Text(other.to_string()),
    }
}
