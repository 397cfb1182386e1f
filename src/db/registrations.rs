use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::TranscriptLine;

/// Record a graded course for a student. Repeated (student, course) pairs
/// are stored as separate rows.
pub fn create_registration(
    conn: &Connection,
    student_email: &str,
    course_name: &str,
    grade: f64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO registrations (student_email, course_name, grade) VALUES (?1, ?2, ?3)",
        params![student_email, course_name, grade],
    )
    .context("failed to insert registration")?;
    Ok(())
}

/// A student's registrations joined with their course. Rows whose course no
/// longer exists come back with empty course details.
pub fn fetch_transcript_lines(
    conn: &Connection,
    student_email: &str,
) -> Result<Vec<TranscriptLine>> {
    let mut stmt = conn
        .prepare(
            "SELECT r.course_name, c.trimester, c.credits, r.grade
             FROM registrations r
             LEFT JOIN courses c ON c.name = r.course_name
             WHERE r.student_email = ?1
             ORDER BY r.id",
        )
        .context("failed to prepare transcript query")?;

    let lines = stmt
        .query_map([student_email], |row| {
            Ok(TranscriptLine {
                course_name: row.get(0)?,
                trimester: row.get(1)?,
                credits: row.get(2)?,
                grade: row.get(3)?,
            })
        })
        .context("failed to iterate registrations")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect registrations")?;

    Ok(lines)
}

/// Drop every registration belonging to a student, returning how many rows
/// went away.
pub fn delete_registrations_for_student(conn: &Connection, student_email: &str) -> Result<usize> {
    conn.execute(
        "DELETE FROM registrations WHERE student_email = ?1",
        params![student_email],
    )
    .context("failed to delete registrations")
}

pub fn count_registrations(conn: &Connection, student_email: &str) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM registrations WHERE student_email = ?1",
        params![student_email],
        |row| row.get(0),
    )
    .context("failed to count registrations")
}
