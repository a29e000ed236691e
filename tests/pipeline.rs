use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Format, Workbook};
use tempfile::tempdir;
use torneros_tools::ToolError;
use torneros_tools::assemble::{GRADES_SHEET, OutputCell, STUDENTS_SHEET, build_workbook};
use torneros_tools::config::{GRADES_FILE, MergeConfig, STUDENTS_FILE};
use torneros_tools::model::columns::{grades, students};
use torneros_tools::pipeline;

fn write_students(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date = Format::new().set_num_format("yyyy-mm-dd");
    for (col, header) in ["idCode", "gender", "birthdate", "section", "notes"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header).expect("header");
    }
    sheet.write_string(1, 0, "1001").expect("id");
    sheet.write_string(1, 1, "Male").expect("gender");
    sheet
        .write_number_with_format(1, 2, 37_500.0, &date)
        .expect("birthdate");
    sheet.write_string(1, 3, "BSIT - 3A").expect("section");
    sheet.write_string(1, 4, "private note").expect("notes");
    sheet.write_number(2, 1, 2.0).expect("gender code");
    sheet.write_string(2, 3, "BSCS-1B").expect("section");
    workbook.save(path).expect("students saved");
}

fn write_grades(path: &Path, ids: &[&str]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in [
        "studentIdCode",
        "prelim",
        "midterm",
        "prefinal",
        "finals",
        "schoolYear",
        "semester",
    ]
    .iter()
    .enumerate()
    {
        sheet.write_string(0, col as u16, *header).expect("header");
    }
    for (offset, id) in ids.iter().enumerate() {
        let row = offset as u32 + 1;
        sheet.write_string(row, 0, *id).expect("id");
        for col in 1..=4 {
            sheet.write_number(row, col, 88.0).expect("score");
        }
        sheet.write_string(row, 5, "2024-2025").expect("school year");
        sheet.write_string(row, 6, "2nd Semester").expect("semester");
    }
    workbook.save(path).expect("grades saved");
}

fn config_in(dir: &Path) -> MergeConfig {
    MergeConfig {
        students_path: dir.join(STUDENTS_FILE),
        grades_path: dir.join(GRADES_FILE),
        output_path: dir.join("Unified.xlsx"),
        seed: Some(42),
        ..MergeConfig::default()
    }
}

fn cell_text(range: &calamine::Range<DataType>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[test]
fn unified_workbook_links_grades_to_students() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = config_in(temp_dir.path());
    write_students(&config.students_path);
    write_grades(&config.grades_path, &["1001", "1001", "9999"]);

    let summary = pipeline::run(&config).expect("pipeline run");

    assert_eq!(summary.students_written, 2);
    assert_eq!(summary.grades_written, 2);
    assert_eq!(summary.grade_rows_dropped, 1);
    assert_eq!(summary.output, config.output_path);

    let mut output: Xlsx<_> = open_workbook(&config.output_path).expect("output opened");
    assert_eq!(
        output.sheet_names().to_vec(),
        vec![STUDENTS_SHEET.to_string(), GRADES_SHEET.to_string()]
    );

    let students_range = output
        .worksheet_range(STUDENTS_SHEET)
        .expect("students sheet")
        .expect("students read");
    assert_eq!(cell_text(&students_range, 0, 0), "student_id");
    assert_eq!(cell_text(&students_range, 0, 7), "email");
    assert_eq!(cell_text(&students_range, 1, 0), "1001");
    assert_eq!(cell_text(&students_range, 1, 1), "Alex Santos");
    assert_eq!(cell_text(&students_range, 1, 2), "Male");
    assert_eq!(cell_text(&students_range, 1, 5), "BSIT");
    assert_eq!(cell_text(&students_range, 1, 7), "student1001@torneros.edu.ph");
    assert_eq!(cell_text(&students_range, 2, 1), "Alex Garcia");
    assert_eq!(cell_text(&students_range, 2, 2), "Female");
    assert_eq!(cell_text(&students_range, 2, 5), "BSCS");
    let generated_id = cell_text(&students_range, 2, 0);
    assert_eq!(generated_id.len(), 6);
    assert_ne!(generated_id, "1001");
    let contact = cell_text(&students_range, 1, 6);
    assert!(contact.starts_with("09") && contact.len() == 11);

    let grades_range = output
        .worksheet_range(GRADES_SHEET)
        .expect("grades sheet")
        .expect("grades read");
    assert_eq!(cell_text(&grades_range, 0, 11), "_student_id_key");
    assert_eq!(cell_text(&grades_range, 1, 11), "1001");
    assert_eq!(cell_text(&grades_range, 2, 11), "1001");
    assert_eq!(cell_text(&grades_range, 3, 11), "");
    assert_eq!(cell_text(&grades_range, 1, 9), "2024-2025");

    let grade_formulas = output
        .worksheet_formula(GRADES_SHEET)
        .expect("grades formulas")
        .expect("grades formulas read");
    let lookup = cell_text_formula(&grade_formulas, 1, 0);
    assert!(lookup.contains("VLOOKUP(L2,StudentsTable,2,FALSE)"), "{lookup}");
    assert!(cell_text_formula(&grade_formulas, 2, 6).contains("AVERAGE(C3:F3)"));
    assert!(cell_text_formula(&grade_formulas, 1, 8).contains("PASSED"));

    let student_formulas = output
        .worksheet_formula(STUDENTS_SHEET)
        .expect("students formulas")
        .expect("students formulas read");
    assert!(cell_text_formula(&student_formulas, 1, 4).contains("DATEDIF(D2,TODAY(),\"Y\")"));
}

fn cell_text_formula(range: &calamine::Range<String>, row: u32, col: u32) -> String {
    range.get_value((row, col)).cloned().unwrap_or_default()
}

#[test]
fn missing_inputs_are_all_reported_before_any_output() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = config_in(temp_dir.path());

    let error = pipeline::run(&config).expect_err("inputs are missing");

    match &error {
        ToolError::MissingInputs(paths) => {
            assert_eq!(paths, &vec![config.students_path.clone(), config.grades_path.clone()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    let message = error.to_string();
    assert!(message.contains(STUDENTS_FILE) && message.contains(GRADES_FILE));
    assert!(!config.output_path.exists());
}

#[test]
fn single_missing_input_is_named() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = config_in(temp_dir.path());
    write_students(&config.students_path);

    let error = pipeline::run(&config).expect_err("grades are missing");

    let message = error.to_string();
    assert!(message.contains(GRADES_FILE));
    assert!(!message.contains(STUDENTS_FILE));
    assert!(!config.output_path.exists());
}

#[test]
fn header_only_grades_still_produce_a_table_row() {
    let temp_dir = tempdir().expect("temporary directory");
    let config = config_in(temp_dir.path());
    write_students(&config.students_path);
    write_grades(&config.grades_path, &[]);

    let summary = pipeline::run(&config).expect("pipeline run");

    assert_eq!(summary.grades_written, 0);
    let parts = read_package(&config.output_path);

    let grades_table = table_part(&parts, "GradesTable");
    assert!(grades_table.contains(r#"ref="A1:I2""#), "{grades_table}");
    assert!(grades_table.contains("TableStyleMedium9"), "{grades_table}");
    assert!(grades_table.contains(r#"showRowStripes="1""#), "{grades_table}");
    assert!(grades_table.contains(r#"showFirstColumn="0""#), "{grades_table}");
    assert!(grades_table.contains(r#"showLastColumn="0""#), "{grades_table}");
    let students_table = table_part(&parts, "StudentsTable");
    assert!(students_table.contains(r#"ref="A1:H3""#), "{students_table}");

    let students_xml = &parts["xl/worksheets/sheet1.xml"];
    assert!(students_xml.contains(r#"sqref="C2:C5000""#), "{students_xml}");
    assert!(students_xml.contains("Male,Female"), "{students_xml}");

    let grades_xml = &parts["xl/worksheets/sheet2.xml"];
    let key_column_hidden = grades_xml
        .split("<col ")
        .skip(1)
        .filter_map(|rest| rest.split("/>").next())
        .any(|col| col.contains(r#"min="12""#) && col.contains(r#"hidden="1""#));
    assert!(key_column_hidden, "{grades_xml}");
    for column in ["I2", "J2", "K2"] {
        assert!(
            grades_xml.contains(&format!(r#"<conditionalFormatting sqref="{column}">"#)),
            "{grades_xml}"
        );
    }
    assert_eq!(grades_xml.matches(r#"stopIfTrue="1""#).count(), 6);
    for remarks in ["PASSED", "FAILED"] {
        let plain = format!(r#"$I2="{remarks}""#);
        let escaped = format!("$I2=&quot;{remarks}&quot;");
        assert!(
            grades_xml.contains(&plain) || grades_xml.contains(&escaped),
            "{grades_xml}"
        );
    }
}

/// Every XML part of an `.xlsx` package keyed by its path inside the archive.
fn read_package(path: &Path) -> BTreeMap<String, String> {
    let file = File::open(path).expect("output opened");
    let mut archive = zip::ZipArchive::new(file).expect("output is a zip package");
    let mut parts = BTreeMap::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("package entry");
        if !entry.name().ends_with(".xml") {
            continue;
        }
        let name = entry.name().to_string();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).expect("package entry read");
        parts.insert(name, contents);
    }
    parts
}

fn table_part<'a>(parts: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    let display_name = format!(r#"displayName="{name}""#);
    parts
        .iter()
        .filter(|(path, _)| path.starts_with("xl/tables/"))
        .map(|(_, xml)| xml.as_str())
        .find(|xml| xml.contains(&display_name))
        .expect("table part present")
}

#[test]
fn layout_describes_tables_styles_and_rules() {
    let workbook = build_workbook(&[], &[], 5000);

    let students_sheet = workbook.sheet(STUDENTS_SHEET).expect("students layout");
    assert_eq!(students_sheet.table.name, "StudentsTable");
    assert_eq!(students_sheet.table.range(), "A1:H2");
    assert!(students_sheet.table.banded_rows);
    assert!(!students_sheet.table.first_column && !students_sheet.table.last_column_emphasis);
    let validation = &students_sheet.validations[0];
    assert_eq!(validation.column, students::GENDER);
    assert_eq!((validation.first_row, validation.last_row), (2, 5000));
    assert_eq!(validation.values, vec!["Male", "Female"]);
    assert_eq!(students_sheet.columns[usize::from(students::ID)].fill, Some(0xD9D9D9));
    assert_eq!(students_sheet.columns[usize::from(students::AGE)].fill, Some(0xD9D9D9));
    assert_eq!(students_sheet.columns[usize::from(students::GENDER)].fill, Some(0xDBEAFE));

    let grades_sheet = workbook.sheet(GRADES_SHEET).expect("grades layout");
    assert_eq!(grades_sheet.table.name, "GradesTable");
    assert_eq!(grades_sheet.table.range(), "A1:I2");
    assert!(grades_sheet.rows.is_empty());
    assert_eq!(grades_sheet.cell(2, grades::FULL_NAME), None);
    assert!(grades_sheet.columns[usize::from(grades::STUDENT_KEY)].hidden);
    assert_eq!(
        grades_sheet
            .columns
            .iter()
            .filter(|column| column.hidden)
            .count(),
        1
    );
    let ranges: Vec<u16> = grades_sheet
        .conditional_formats
        .iter()
        .map(|range| range.column)
        .collect();
    assert_eq!(ranges, vec![grades::REMARKS, grades::SCHOOL_YEAR, grades::SEMESTER]);
    for range in &grades_sheet.conditional_formats {
        assert_eq!((range.first_row, range.last_row), (2, 2));
        assert_eq!(range.rules.len(), 2);
        assert_eq!(range.rules[0].formula, r#"=$I2="PASSED""#);
        assert_eq!(range.rules[0].fill, 0xC6EFCE);
        assert_eq!(range.rules[1].formula, r#"=$I2="FAILED""#);
        assert_eq!(range.rules[1].fill, 0xFFC7CE);
        assert!(range.rules.iter().all(|rule| rule.stop_if_true));
    }
}

#[test]
fn computed_columns_are_formulas() {
    let temp_dir = tempdir().expect("temporary directory");
    let mut config = config_in(temp_dir.path());
    config.output_path = temp_dir.path().join("unused.xlsx");
    write_students(&config.students_path);
    write_grades(&config.grades_path, &["1001"]);

    let students_source =
        torneros_tools::io::excel_read::read_source(&config.students_path).expect("students");
    let grades_source =
        torneros_tools::io::excel_read::read_source(&config.grades_path).expect("grades");
    let mut rng = config.rng();
    let merged = pipeline::merge_sources(&students_source, &grades_source, 6, &mut rng)
        .expect("merged");
    let workbook = build_workbook(&merged.students, &merged.grades, 5000);

    let students_sheet = workbook.sheet(STUDENTS_SHEET).expect("students layout");
    assert_eq!(students_sheet.rows.len(), 2);
    assert_eq!(students_sheet.table.range(), "A1:H3");
    assert!(matches!(
        students_sheet.cell(2, students::AGE),
        Some(OutputCell::Formula(text)) if text.starts_with("=IF(D2")
    ));
    assert!(matches!(
        students_sheet.cell(2, students::BIRTHDATE),
        Some(OutputCell::Date(_)) | Some(OutputCell::Number(_))
    ));
    assert_eq!(
        students_sheet.cell(3, students::BIRTHDATE),
        Some(&OutputCell::Blank)
    );

    let grades_sheet = workbook.sheet(GRADES_SHEET).expect("grades layout");
    for column in [grades::FULL_NAME, grades::FINAL_AVERAGE, grades::GPA, grades::REMARKS] {
        assert!(
            matches!(grades_sheet.cell(2, column), Some(OutputCell::Formula(_))),
            "column {column}"
        );
    }
    assert_eq!(
        grades_sheet.cell(2, grades::PRELIM),
        Some(&OutputCell::Number(88.0))
    );
    assert_eq!(
        grades_sheet.cell(2, grades::STUDENT_KEY),
        Some(&OutputCell::Text("1001".to_string()))
    );
}
