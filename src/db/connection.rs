use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

/// Open (or create) the database file and make sure every table exists.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path).context("failed to open SQLite database")?;
    debug!(path = %path.display(), "opened gradebook database");
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Throwaway store used by tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Run lazy table creation. Registrations carry no foreign keys or cascades:
/// the grade book removes a student's registrations itself when the student
/// is deleted, and rows may keep pointing at a course name that no longer
/// resolves.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            email TEXT PRIMARY KEY,
            names TEXT NOT NULL,
            gpa REAL NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("failed to create students table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses (
            name TEXT PRIMARY KEY,
            trimester TEXT NOT NULL,
            credits INTEGER NOT NULL CHECK (credits > 0)
        )",
        [],
    )
    .context("failed to create courses table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS registrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_email TEXT NOT NULL,
            course_name TEXT NOT NULL,
            grade REAL NOT NULL
        )",
        [],
    )
    .context("failed to create registrations table")?;

    Ok(())
}
