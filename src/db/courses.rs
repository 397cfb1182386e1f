use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::map_unique_constraint;
use crate::models::Course;

/// Retrieve every course in insertion order.
pub fn fetch_courses(conn: &Connection) -> Result<Vec<Course>> {
    let mut stmt = conn
        .prepare("SELECT name, trimester, credits FROM courses ORDER BY rowid")
        .context("failed to prepare course query")?;

    let courses = stmt
        .query_map([], |row| {
            Ok(Course {
                name: row.get(0)?,
                trimester: row.get(1)?,
                credits: row.get(2)?,
            })
        })
        .context("failed to load courses")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect courses")?;

    Ok(courses)
}

pub fn fetch_course(conn: &Connection, name: &str) -> Result<Option<Course>> {
    conn.query_row(
        "SELECT name, trimester, credits FROM courses WHERE name = ?1",
        params![name],
        |row| {
            Ok(Course {
                name: row.get(0)?,
                trimester: row.get(1)?,
                credits: row.get(2)?,
            })
        },
    )
    .optional()
    .context("failed to look up course")
}

/// Insert a new course row, returning the hydrated struct so the caller can
/// push it straight into the in-memory list.
pub fn create_course(
    conn: &Connection,
    name: &str,
    trimester: &str,
    credits: i64,
) -> Result<Course> {
    conn.execute(
        "INSERT INTO courses (name, trimester, credits) VALUES (?1, ?2, ?3)",
        params![name, trimester, credits],
    )
    .map_err(|err| map_unique_constraint(err, "Course", name))
    .context("failed to insert course")?;

    Ok(Course {
        name: name.to_string(),
        trimester: trimester.to_string(),
        credits,
    })
}
