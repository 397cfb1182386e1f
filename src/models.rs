//! Domain models that mirror the SQLite schema and get passed between the
//! grade book and the presentation layer. They stay light-weight data holders;
//! the only logic living here is the GPA formula because every layer has to
//! agree on it.

#[derive(Debug, Clone, PartialEq)]
/// A course students can register for. The name doubles as the primary key.
pub struct Course {
    pub name: String,
    /// Free-form term label such as `T1` or `Fall 2024`.
    pub trimester: String,
    /// Weight used by the GPA average. Always positive.
    pub credits: i64,
}

#[derive(Debug, Clone, PartialEq)]
/// One graded course on a student's record. Registrations are not addressable
/// on their own; they only exist attached to a student.
pub struct Registration {
    pub course: Course,
    pub grade: f64,
}

#[derive(Debug, Clone, PartialEq)]
/// In-memory representation of a student row plus the registrations loaded
/// for it.
pub struct Student {
    /// Unique key in the `students` table.
    pub email: String,
    pub names: String,
    gpa: f64,
    registrations: Vec<Registration>,
}

impl Student {
    /// A freshly enrolled student with no registrations and a GPA of zero.
    pub fn new(email: impl Into<String>, names: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            names: names.into(),
            gpa: 0.0,
            registrations: Vec::new(),
        }
    }

    /// Rebuild a student from persisted rows. The GPA is always derived from
    /// the registrations, never taken from the caller.
    pub fn with_registrations(
        email: impl Into<String>,
        names: impl Into<String>,
        registrations: Vec<Registration>,
    ) -> Self {
        let mut student = Self::new(email, names);
        student.registrations = registrations;
        student.recalculate_gpa();
        student
    }

    pub fn gpa(&self) -> f64 {
        self.gpa
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Append a registration and recompute the GPA from scratch. Returns the
    /// new GPA so the caller can persist it.
    pub fn register(&mut self, course: Course, grade: f64) -> f64 {
        self.registrations.push(Registration { course, grade });
        self.recalculate_gpa()
    }

    fn recalculate_gpa(&mut self) -> f64 {
        self.gpa = weighted_gpa(&self.registrations);
        self.gpa
    }
}

/// Credit-weighted average of the grades. Zero total credits yields `0.0`
/// rather than `NaN`.
pub fn weighted_gpa(registrations: &[Registration]) -> f64 {
    let (points, credits) = registrations
        .iter()
        .fold((0.0_f64, 0_i64), |(points, credits), reg| {
            (
                points + reg.grade * reg.course.credits as f64,
                credits + reg.course.credits,
            )
        });

    if credits > 0 {
        points / credits as f64
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A persisted registration joined with its course details. The trimester is
/// optional because registrations may outlive the course row they point to.
pub struct TranscriptLine {
    pub course_name: String,
    pub trimester: Option<String>,
    pub credits: Option<i64>,
    pub grade: f64,
}

#[derive(Debug, Clone, PartialEq)]
/// Everything the transcript report prints for a single student.
pub struct Transcript {
    pub email: String,
    pub names: String,
    pub gpa: f64,
    pub lines: Vec<TranscriptLine>,
}

#[derive(Debug, Clone, PartialEq)]
/// A row of the `students` table as stored, used by store-backed reports.
pub struct StudentRow {
    pub email: String,
    pub names: String,
    pub gpa: f64,
}
