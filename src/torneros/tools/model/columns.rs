//! Zero-based column positions and header labels of the output sheets.

/// Columns of the `Students` sheet.
pub mod students {
    pub const ID: u16 = 0;
    pub const FULL_NAME: u16 = 1;
    pub const GENDER: u16 = 2;
    pub const BIRTHDATE: u16 = 3;
    pub const AGE: u16 = 4;
    pub const COURSE: u16 = 5;
    pub const CONTACT_NUMBER: u16 = 6;
    pub const EMAIL: u16 = 7;

    pub const HEADERS: [&str; 8] = [
        "student_id",
        "fullName",
        "gender",
        "birthdate",
        "age",
        "course",
        "contactNumber",
        "email",
    ];

    /// Last column covered by `StudentsTable`.
    pub const TABLE_LAST: u16 = EMAIL;
}

/// Columns of the `Grades` sheet.
pub mod grades {
    pub const FULL_NAME: u16 = 0;
    pub const SUBJECT_NAME: u16 = 1;
    pub const PRELIM: u16 = 2;
    pub const MIDTERM: u16 = 3;
    pub const PREFINAL: u16 = 4;
    pub const FINALS: u16 = 5;
    pub const FINAL_AVERAGE: u16 = 6;
    pub const GPA: u16 = 7;
    pub const REMARKS: u16 = 8;
    pub const SCHOOL_YEAR: u16 = 9;
    pub const SEMESTER: u16 = 10;
    pub const STUDENT_KEY: u16 = 11;

    pub const HEADERS: [&str; 12] = [
        "student_id",
        "subject_name",
        "prelim",
        "midterm",
        "prefinal",
        "finals",
        "Final Average",
        "GPA",
        "Remarks",
        "schoolYear",
        "semester",
        "_student_id_key",
    ];

    /// Last column covered by `GradesTable`.
    pub const TABLE_LAST: u16 = REMARKS;
}
