//! The grade book keeps the students and courses in memory and mirrors every
//! change into SQLite. The store is always written first; the in-memory lists
//! only change once the write committed, so a failed statement never leaves
//! the two copies disagreeing.

use anyhow::Context;
use rusqlite::Connection;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db;
use crate::models::{Course, Registration, Student, StudentRow, Transcript};

/// Difference below which a persisted GPA counts as current.
const GPA_EPSILON: f64 = 1e-9;

/// Failures surfaced by grade book operations. Everything except `Storage` is
/// a user mistake that leaves both copies of the data untouched.
#[derive(Debug, Error)]
pub enum GradeBookError {
    #[error("Student {0} not found.")]
    StudentNotFound(String),
    #[error("Course {0} not found.")]
    CourseNotFound(String),
    #[error("Student {0} already exists.")]
    DuplicateStudent(String),
    #[error("Course {0} already exists.")]
    DuplicateCourse(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl GradeBookError {
    /// Whether the menu can report the error and keep going.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GradeBookError::Storage(_))
    }
}

pub type Result<T, E = GradeBookError> = std::result::Result<T, E>;

/// Central state container. Owns the store handle for the lifetime of the
/// session.
pub struct GradeBook {
    conn: Connection,
    students: Vec<Student>,
    courses: Vec<Course>,
}

impl GradeBook {
    /// Hydrate the in-memory lists from the store. Registrations pointing at
    /// a missing course are left out of the in-memory record, and a stored GPA
    /// that no longer matches the registrations is rewritten.
    pub fn load(conn: Connection) -> anyhow::Result<Self> {
        let courses = db::fetch_courses(&conn)?;
        let rows = db::fetch_students(&conn)?;

        let mut students = Vec::with_capacity(rows.len());
        for row in rows {
            let registrations = db::fetch_transcript_lines(&conn, &row.email)?
                .into_iter()
                .filter_map(|line| {
                    Some(Registration {
                        course: Course {
                            name: line.course_name,
                            trimester: line.trimester?,
                            credits: line.credits?,
                        },
                        grade: line.grade,
                    })
                })
                .collect();

            let student = Student::with_registrations(row.email, row.names, registrations);
            if (student.gpa() - row.gpa).abs() > GPA_EPSILON {
                warn!(
                    email = %student.email,
                    stored = row.gpa,
                    computed = student.gpa(),
                    "stored GPA was stale, rewriting"
                );
                db::update_student_gpa(&conn, &student.email, student.gpa())?;
            }
            students.push(student);
        }

        info!(
            students = students.len(),
            courses = courses.len(),
            "grade book loaded"
        );

        Ok(Self {
            conn,
            students,
            courses,
        })
    }

    /// Borrow the underlying store for read-only queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn student(&self, email: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.email == email)
    }

    pub fn course(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.name == name)
    }

    fn student_index(&self, email: &str) -> Result<usize> {
        self.students
            .iter()
            .position(|s| s.email == email)
            .ok_or_else(|| GradeBookError::StudentNotFound(email.to_string()))
    }

    pub fn add_student(&mut self, email: &str, names: &str) -> Result<&Student> {
        if self.student(email).is_some() {
            return Err(GradeBookError::DuplicateStudent(email.to_string()));
        }

        db::create_student(&self.conn, email, names)?;
        info!(%email, "student added");

        self.students.push(Student::new(email, names));
        Ok(&self.students[self.students.len() - 1])
    }

    pub fn add_course(&mut self, name: &str, trimester: &str, credits: i64) -> Result<&Course> {
        if self.course(name).is_some() {
            return Err(GradeBookError::DuplicateCourse(name.to_string()));
        }

        let course = db::create_course(&self.conn, name, trimester, credits)?;
        info!(%name, %trimester, credits, "course added");

        self.courses.push(course);
        Ok(&self.courses[self.courses.len() - 1])
    }

    /// Record a grade and recompute the student's GPA. Both rows are written
    /// in one transaction before memory is touched. Grades are not range
    /// checked and repeated registrations for the same course are kept.
    pub fn register(&mut self, email: &str, course_name: &str, grade: f64) -> Result<&Student> {
        let index = self.student_index(email)?;
        let course = self
            .course(course_name)
            .cloned()
            .ok_or_else(|| GradeBookError::CourseNotFound(course_name.to_string()))?;

        let mut updated = self.students[index].clone();
        let gpa = updated.register(course, grade);

        let tx = self
            .conn
            .transaction()
            .context("failed to begin registration")?;
        db::create_registration(&tx, email, course_name, grade)?;
        db::update_student_gpa(&tx, email, gpa)?;
        tx.commit().context("failed to commit registration")?;

        info!(%email, course = %course_name, grade, gpa, "student registered");
        self.students[index] = updated;
        Ok(&self.students[index])
    }

    /// Students ordered by GPA, best first. Equal GPAs keep their list order.
    pub fn ranking(&self) -> Vec<&Student> {
        let mut ranked: Vec<&Student> = self.students.iter().collect();
        ranked.sort_by(|a, b| b.gpa().total_cmp(&a.gpa()));
        ranked
    }

    /// Store-backed search over the inclusive GPA range.
    pub fn search_by_gpa(&self, min: f64, max: f64) -> Result<Vec<StudentRow>> {
        let rows = db::fetch_students_in_gpa_range(&self.conn, min, max)?;
        debug!(min, max, matches = rows.len(), "GPA range search");
        Ok(rows)
    }

    /// Persisted registrations for one student, joined with course details.
    pub fn transcript(&self, email: &str) -> Result<Transcript> {
        let student = self
            .student(email)
            .ok_or_else(|| GradeBookError::StudentNotFound(email.to_string()))?;
        self.build_transcript(student)
    }

    /// Transcripts for every student in list order.
    pub fn transcripts(&self) -> Result<Vec<Transcript>> {
        self.students
            .iter()
            .map(|student| self.build_transcript(student))
            .collect()
    }

    fn build_transcript(&self, student: &Student) -> Result<Transcript> {
        let lines = db::fetch_transcript_lines(&self.conn, &student.email)?;
        Ok(Transcript {
            email: student.email.clone(),
            names: student.names.clone(),
            gpa: student.gpa(),
            lines,
        })
    }

    /// Replace the names and/or email of a student. `None` keeps the current
    /// value. A new email moves the student to the end of the list, and the
    /// student's registrations follow it in the store.
    pub fn update_student(
        &mut self,
        email: &str,
        new_names: Option<&str>,
        new_email: Option<&str>,
    ) -> Result<&Student> {
        let index = self.student_index(email)?;
        let new_email = new_email.filter(|candidate| *candidate != email);

        if let Some(candidate) = new_email {
            if self.student(candidate).is_some() {
                return Err(GradeBookError::DuplicateStudent(candidate.to_string()));
            }
        }

        let tx = self
            .conn
            .transaction()
            .context("failed to begin student update")?;
        if let Some(names) = new_names {
            db::update_student_names(&tx, email, names)?;
        }
        if let Some(candidate) = new_email {
            db::update_student_email(&tx, email, candidate)?;
        }
        tx.commit().context("failed to commit student update")?;

        if let Some(names) = new_names {
            self.students[index].names = names.to_string();
        }

        let index = match new_email {
            Some(candidate) => {
                let mut student = self.students.remove(index);
                student.email = candidate.to_string();
                self.students.push(student);
                self.students.len() - 1
            }
            None => index,
        };

        info!(
            %email,
            new_email = new_email.unwrap_or(email),
            renamed = new_names.is_some(),
            "student updated"
        );
        Ok(&self.students[index])
    }

    /// Remove a student along with all of their registrations.
    pub fn delete_student(&mut self, email: &str) -> Result<Student> {
        let index = self.student_index(email)?;

        let tx = self
            .conn
            .transaction()
            .context("failed to begin student deletion")?;
        let removed_registrations = db::delete_registrations_for_student(&tx, email)?;
        db::delete_student(&tx, email)?;
        tx.commit().context("failed to commit student deletion")?;

        info!(%email, removed_registrations, "student deleted");
        Ok(self.students.remove(index))
    }

    /// In-memory record of one student.
    pub fn view_student(&self, email: &str) -> Result<&Student> {
        self.student(email)
            .ok_or_else(|| GradeBookError::StudentNotFound(email.to_string()))
    }

    /// Every persisted student row.
    pub fn view_all_students(&self) -> Result<Vec<StudentRow>> {
        Ok(db::fetch_students(&self.conn)?)
    }
}
