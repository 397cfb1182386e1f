use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::map_unique_constraint;
use crate::models::StudentRow;

/// Every persisted student in insertion order.
pub fn fetch_students(conn: &Connection) -> Result<Vec<StudentRow>> {
    let mut stmt = conn
        .prepare("SELECT email, names, gpa FROM students ORDER BY rowid")
        .context("failed to prepare student query")?;

    let students = stmt
        .query_map([], |row| {
            Ok(StudentRow {
                email: row.get(0)?,
                names: row.get(1)?,
                gpa: row.get(2)?,
            })
        })
        .context("failed to load students")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect students")?;

    Ok(students)
}

pub fn fetch_student(conn: &Connection, email: &str) -> Result<Option<StudentRow>> {
    conn.query_row(
        "SELECT email, names, gpa FROM students WHERE email = ?1",
        params![email],
        |row| {
            Ok(StudentRow {
                email: row.get(0)?,
                names: row.get(1)?,
                gpa: row.get(2)?,
            })
        },
    )
    .optional()
    .context("failed to look up student")
}

/// Students whose stored GPA lies in the inclusive range, best first.
pub fn fetch_students_in_gpa_range(
    conn: &Connection,
    min: f64,
    max: f64,
) -> Result<Vec<StudentRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT email, names, gpa FROM students
             WHERE gpa BETWEEN ?1 AND ?2
             ORDER BY gpa DESC, rowid",
        )
        .context("failed to prepare GPA range query")?;

    let students = stmt
        .query_map(params![min, max], |row| {
            Ok(StudentRow {
                email: row.get(0)?,
                names: row.get(1)?,
                gpa: row.get(2)?,
            })
        })
        .context("failed to search students by GPA")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect GPA range results")?;

    Ok(students)
}

/// Insert a new student with a zero GPA.
pub fn create_student(conn: &Connection, email: &str, names: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO students (email, names, gpa) VALUES (?1, ?2, 0)",
        params![email, names],
    )
    .map_err(|err| map_unique_constraint(err, "Student", email))
    .context("failed to insert student")?;
    Ok(())
}

pub fn update_student_names(conn: &Connection, email: &str, names: &str) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE students SET names = ?1 WHERE email = ?2",
            params![names, email],
        )
        .context("failed to update student names")?;

    if updated == 0 {
        Err(anyhow!("Student not found"))
    } else {
        Ok(())
    }
}

/// Re-key a student. Registrations are moved to the new email too so they
/// stay attached to the student across restarts.
pub fn update_student_email(conn: &Connection, old_email: &str, new_email: &str) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE students SET email = ?1 WHERE email = ?2",
            params![new_email, old_email],
        )
        .map_err(|err| map_unique_constraint(err, "Student", new_email))
        .context("failed to update student email")?;

    if updated == 0 {
        return Err(anyhow!("Student not found"));
    }

    conn.execute(
        "UPDATE registrations SET student_email = ?1 WHERE student_email = ?2",
        params![new_email, old_email],
    )
    .context("failed to move registrations to the new email")?;

    Ok(())
}

pub fn update_student_gpa(conn: &Connection, email: &str, gpa: f64) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE students SET gpa = ?1 WHERE email = ?2",
            params![gpa, email],
        )
        .context("failed to update student GPA")?;

    if updated == 0 {
        Err(anyhow!("Student not found"))
    } else {
        Ok(())
    }
}

/// Remove a student row. The schema does not cascade, so callers delete the
/// student's registrations separately.
pub fn delete_student(conn: &Connection, email: &str) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM students WHERE email = ?1", params![email])
        .context("failed to delete student")?;

    if deleted == 0 {
        Err(anyhow!("Student not found"))
    } else {
        Ok(())
    }
}
