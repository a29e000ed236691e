use std::fs;
use std::path::Path;

use rust_xlsxwriter::{
    Color, ConditionalFormatFormula, DataValidation, Format, Formula, Table, TableColumn,
    TableStyle, Workbook, Worksheet,
};
use tracing::debug;

use crate::torneros::tools::assemble::{
    ColumnSpec, DATE_FORMAT, OutputCell, SheetLayout, TEXT_FORMAT, WorkbookData,
};
use crate::torneros::tools::error::Result;

/// Writes the provided workbook data to the given path.
///
/// The workbook is rendered into memory first so a failure never leaves a
/// partially written file behind.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let buffer = render_workbook(workbook)?;
    fs::write(path, buffer)?;
    Ok(())
}

/// Renders the workbook into the bytes of an `.xlsx` file.
pub fn render_workbook(workbook: &WorkbookData) -> Result<Vec<u8>> {
    let mut workbook_writer = Workbook::new();

    for sheet in &workbook.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.sheet_name)?;
        write_sheet(worksheet, sheet)?;
        debug!(
            sheet = %sheet.sheet_name,
            rows = sheet.rows.len(),
            table = %sheet.table.range(),
            "sheet rendered"
        );
    }

    Ok(workbook_writer.save_to_buffer()?)
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &SheetLayout) -> Result<()> {
    let fill_last_row = sheet.fill_last_row();
    let table_last_column = usize::from(sheet.table.last_column);

    // Headers inside the table are written by the table itself.
    for (col_idx, column) in sheet.columns.iter().enumerate().skip(table_last_column + 1) {
        let col = col_idx as u16;
        match column_format(column, 1, fill_last_row, None) {
            Some(format) => worksheet.write_string_with_format(0, col, &column.header, &format)?,
            None => worksheet.write_string(0, col, &column.header)?,
        };
    }

    for (row_idx, cells) in sheet.rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col_idx, cell) in cells.iter().enumerate() {
            let column = &sheet.columns[col_idx];
            let format = column_format(column, row + 1, fill_last_row, Some(cell));
            write_cell(worksheet, row, col_idx as u16, cell, format.as_ref())?;
        }
    }

    // Text-formatted columns keep their format down to the table's last row.
    for row in (sheet.rows.len() as u32 + 1)..sheet.table.last_row {
        for (col_idx, column) in sheet.columns.iter().enumerate() {
            if column.text {
                let format = Format::new().set_num_format(TEXT_FORMAT);
                worksheet.write_blank(row, col_idx as u16, &format)?;
            }
        }
    }

    let table_columns: Vec<TableColumn> = sheet.columns[..=table_last_column]
        .iter()
        .map(|column| {
            let table_column = TableColumn::new().set_header(&column.header);
            match column_format(column, 1, fill_last_row, None) {
                Some(format) => table_column.set_header_format(format),
                None => table_column,
            }
        })
        .collect();
    let table = Table::new()
        .set_name(&sheet.table.name)
        .set_style(TableStyle::Medium9)
        .set_banded_rows(sheet.table.banded_rows)
        .set_first_column(sheet.table.first_column)
        .set_last_column(sheet.table.last_column_emphasis)
        .set_columns(&table_columns);
    worksheet.add_table(
        0,
        0,
        sheet.table.last_row - 1,
        sheet.table.last_column,
        &table,
    )?;

    for (col_idx, column) in sheet.columns.iter().enumerate() {
        if column.hidden {
            worksheet.set_column_hidden(col_idx as u16)?;
        }
    }

    for validation in &sheet.validations {
        let values: Vec<&str> = validation.values.iter().map(String::as_str).collect();
        let rule = DataValidation::new()
            .allow_list_strings(&values)?
            .ignore_blank(validation.allow_blank);
        worksheet.add_data_validation(
            validation.first_row - 1,
            validation.column,
            validation.last_row - 1,
            validation.column,
            &rule,
        )?;
    }

    for range in &sheet.conditional_formats {
        for rule in &range.rules {
            let conditional = ConditionalFormatFormula::new()
                .set_rule(rule.formula.as_str())
                .set_format(Format::new().set_background_color(Color::RGB(rule.fill)))
                .set_stop_if_true(rule.stop_if_true);
            worksheet.add_conditional_format(
                range.first_row - 1,
                range.column,
                range.last_row - 1,
                range.column,
                &conditional,
            )?;
        }
    }

    Ok(())
}

/// Format for a cell of `column` on 1-based spreadsheet `row`, or `None` when
/// the cell needs no formatting.
fn column_format(
    column: &ColumnSpec,
    row: u32,
    fill_last_row: u32,
    cell: Option<&OutputCell>,
) -> Option<Format> {
    let mut format = None;
    if let Some(fill) = column.fill.filter(|_| row <= fill_last_row) {
        format = Some(Format::new().set_background_color(Color::RGB(fill)));
    }
    if row > 1 {
        let num_format = match cell {
            Some(OutputCell::Date(_)) => Some(DATE_FORMAT),
            _ if column.text => Some(TEXT_FORMAT),
            _ => None,
        };
        if let Some(num_format) = num_format {
            format = Some(format.unwrap_or_default().set_num_format(num_format));
        }
    }
    format
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &OutputCell,
    format: Option<&Format>,
) -> Result<()> {
    match (cell, format) {
        (OutputCell::Blank, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (OutputCell::Blank, None) => {}
        (OutputCell::Text(value), Some(format)) => {
            worksheet.write_string_with_format(row, col, value, format)?;
        }
        (OutputCell::Text(value), None) => {
            worksheet.write_string(row, col, value)?;
        }
        (OutputCell::Number(value) | OutputCell::Date(value), Some(format)) => {
            worksheet.write_number_with_format(row, col, *value, format)?;
        }
        (OutputCell::Number(value) | OutputCell::Date(value), None) => {
            worksheet.write_number(row, col, *value)?;
        }
        (OutputCell::Bool(value), Some(format)) => {
            worksheet.write_boolean_with_format(row, col, *value, format)?;
        }
        (OutputCell::Bool(value), None) => {
            worksheet.write_boolean(row, col, *value)?;
        }
        (OutputCell::Formula(text), Some(format)) => {
            worksheet.write_formula_with_format(row, col, Formula::new(text), format)?;
        }
        (OutputCell::Formula(text), None) => {
            worksheet.write_formula(row, col, Formula::new(text))?;
        }
    }
    Ok(())
}
