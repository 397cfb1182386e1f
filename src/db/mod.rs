//! Persistence module split across logical submodules. Every function wraps a
//! single query so the grade book can compose them inside its own
//! transactions.

mod connection;
mod courses;
mod registrations;
mod students;

use rusqlite::{Error as SqlError, ErrorCode};

pub use connection::{ensure_schema, open, open_in_memory};
pub use courses::{create_course, fetch_course, fetch_courses};
pub use registrations::{
    count_registrations, create_registration, delete_registrations_for_student,
    fetch_transcript_lines,
};
pub use students::{
    create_student, delete_student, fetch_student, fetch_students, fetch_students_in_gpa_range,
    update_student_email, update_student_gpa, update_student_names,
};

/// Coerce SQLite constraint errors into human-readable messages. The only
/// constraints we guard are the primary keys on student email and course
/// name.
fn map_unique_constraint(err: SqlError, entity: &str, key: &str) -> anyhow::Error {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        anyhow::anyhow!("{entity} {key} already exists.")
    } else {
        err.into()
    }
}
