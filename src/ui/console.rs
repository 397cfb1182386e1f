use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use tracing::debug;

use super::input::{self, GpaRange, InputError};
use super::table::{ranking_table, student_report, student_rows_table, transcript_report};
use crate::gradebook::{self, GradeBook, GradeBookError};

const BANNER: &str = "\n----------------------------------------------------\n\
------------- Welcome to Grade Book App ------------\n\
----------------------------------------------------";

const MAIN_MENU: &str = "\nGrade Book Menu:\n\
1. Add Student\n\
2. Add Course\n\
3. Register Student for Course\n\
4. Calculate Ranking\n\
5. Search Students by GPA\n\
6. Generate Transcript\n\
7. Update Student\n\
8. Delete Student\n\
9. View Menu\n\
10. Exit";

const VIEW_MENU: &str = "\nView Menu:\n\
1. View Student\n\
2. View All Students\n\
3. Back to Main Menu";

/// Whether the menu loop keeps running after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Severity of a status line.
enum StatusKind {
    Info,
    Error,
}

/// Main menu entries, parsed from the typed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainChoice {
    AddStudent,
    AddCourse,
    Register,
    Ranking,
    Search,
    Transcript,
    UpdateStudent,
    DeleteStudent,
    ViewMenu,
    Exit,
}

impl MainChoice {
    fn parse(raw: &str) -> Option<Self> {
        Some(match raw.trim() {
            "1" => Self::AddStudent,
            "2" => Self::AddCourse,
            "3" => Self::Register,
            "4" => Self::Ranking,
            "5" => Self::Search,
            "6" => Self::Transcript,
            "7" => Self::UpdateStudent,
            "8" => Self::DeleteStudent,
            "9" => Self::ViewMenu,
            "10" => Self::Exit,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewChoice {
    Student,
    AllStudents,
    Back,
}

impl ViewChoice {
    fn parse(raw: &str) -> Option<Self> {
        Some(match raw.trim() {
            "1" => Self::Student,
            "2" => Self::AllStudents,
            "3" => Self::Back,
            _ => return None,
        })
    }
}

/// Prompt-driven front end. Generic over its streams so tests can script a
/// whole session.
pub struct Console<R, W> {
    book: GradeBook,
    input: R,
    output: W,
    colored: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(book: GradeBook, input: R, output: W) -> Self {
        Self {
            book,
            input,
            output,
            colored: false,
        }
    }

    /// Colour status lines. Only worth enabling when the output is a terminal.
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Hand back the grade book and the output sink once the session is over.
    pub fn into_parts(self) -> (GradeBook, W) {
        (self.book, self.output)
    }

    /// Show the banner and keep serving the main menu until the user exits
    /// or input runs out.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{BANNER}").context("failed to write banner")?;

        loop {
            writeln!(self.output, "{MAIN_MENU}").context("failed to write menu")?;
            let Some(raw) = self.read_line("Choose an option: ")? else {
                break;
            };

            let flow = match MainChoice::parse(&raw) {
                Some(choice) => {
                    debug!(?choice, "main menu selection");
                    self.dispatch(choice)?
                }
                None => {
                    self.status("Invalid option, please try again.", StatusKind::Error)?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                break;
            }
        }

        self.output.flush().context("failed to flush output")
    }

    fn dispatch(&mut self, choice: MainChoice) -> Result<Flow> {
        match choice {
            MainChoice::AddStudent => self.add_student(),
            MainChoice::AddCourse => self.add_course(),
            MainChoice::Register => self.register(),
            MainChoice::Ranking => self.ranking(),
            MainChoice::Search => self.search_by_gpa(),
            MainChoice::Transcript => self.transcript(),
            MainChoice::UpdateStudent => self.update_student(),
            MainChoice::DeleteStudent => self.delete_student(),
            MainChoice::ViewMenu => self.view_menu(),
            MainChoice::Exit => Ok(Flow::Exit),
        }
    }

    fn view_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.output, "{VIEW_MENU}").context("failed to write menu")?;
            let Some(raw) = self.read_line("Choose an option: ")? else {
                return Ok(Flow::Exit);
            };

            let flow = match ViewChoice::parse(&raw) {
                Some(ViewChoice::Student) => self.view_student()?,
                Some(ViewChoice::AllStudents) => self.view_all_students()?,
                Some(ViewChoice::Back) => return Ok(Flow::Continue),
                None => {
                    self.status("Invalid option, please try again.", StatusKind::Error)?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn add_student(&mut self) -> Result<Flow> {
        let Some(email) = self.prompt_required("Enter student's email: ", "Email")? else {
            return Ok(Flow::Exit);
        };
        let Some(names) = self.prompt_required("Enter student's names: ", "Names")? else {
            return Ok(Flow::Exit);
        };

        let result = self.book.add_student(&email, &names).map(|_| ());
        if self.settle(result)?.is_some() {
            self.status("Student added successfully.", StatusKind::Info)?;
        }
        Ok(Flow::Continue)
    }

    fn add_course(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt_required("Enter course name: ", "Course name")? else {
            return Ok(Flow::Exit);
        };
        let Some(trimester) = self.prompt_required("Enter trimester: ", "Trimester")? else {
            return Ok(Flow::Exit);
        };
        let Some(credits) = self.prompt("Enter course credits: ", input::credits)? else {
            return Ok(Flow::Exit);
        };

        let result = self.book.add_course(&name, &trimester, credits).map(|_| ());
        if self.settle(result)?.is_some() {
            self.status("Course added successfully.", StatusKind::Info)?;
        }
        Ok(Flow::Continue)
    }

    fn register(&mut self) -> Result<Flow> {
        let Some(email) = self.prompt_required("Enter student's email: ", "Email")? else {
            return Ok(Flow::Exit);
        };
        let Some(course) = self.prompt_required("Enter course name: ", "Course name")? else {
            return Ok(Flow::Exit);
        };
        let Some(grade) = self.prompt("Enter grade: ", input::grade)? else {
            return Ok(Flow::Exit);
        };

        let result = self
            .book
            .register(&email, &course, grade)
            .map(|student| student.names.clone());
        if let Some(names) = self.settle(result)? {
            self.status(
                format!("Registered {names} for {course} with grade {grade}."),
                StatusKind::Info,
            )?;
        }
        Ok(Flow::Continue)
    }

    fn ranking(&mut self) -> Result<Flow> {
        let table = ranking_table(&self.book.ranking());
        writeln!(self.output, "Ranking of students by GPA:\n{table}")
            .context("failed to write ranking")?;
        Ok(Flow::Continue)
    }

    fn search_by_gpa(&mut self) -> Result<Flow> {
        let range = loop {
            let Some(min) =
                self.prompt("Enter minimum GPA: ", |raw| input::number("Minimum GPA", raw))?
            else {
                return Ok(Flow::Exit);
            };
            let Some(max) =
                self.prompt("Enter maximum GPA: ", |raw| input::number("Maximum GPA", raw))?
            else {
                return Ok(Flow::Exit);
            };
            match GpaRange::new(min, max) {
                Ok(range) => break range,
                Err(err) => self.status(err.to_string(), StatusKind::Error)?,
            }
        };

        let result = self.book.search_by_gpa(range.min, range.max);
        if let Some(rows) = self.settle(result)? {
            let table = student_rows_table(&rows);
            writeln!(self.output, "Students with GPA in the specified range:\n{table}")
                .context("failed to write search results")?;
        }
        Ok(Flow::Continue)
    }

    /// A blank email prints every student's transcript.
    fn transcript(&mut self) -> Result<Flow> {
        let Some(email) = self.prompt(
            "Enter student's email (press Enter for all students): ",
            |raw| Ok::<_, InputError>(input::optional(raw)),
        )?
        else {
            return Ok(Flow::Exit);
        };

        let result = match email {
            Some(email) => self.book.transcript(&email).map(|t| vec![t]),
            None => self.book.transcripts(),
        };
        if let Some(transcripts) = self.settle(result)? {
            if transcripts.is_empty() {
                self.status("No students to report.", StatusKind::Info)?;
            }
            for transcript in &transcripts {
                writeln!(self.output, "{}", transcript_report(transcript))
                    .context("failed to write transcript")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn update_student(&mut self) -> Result<Flow> {
        let Some(email) =
            self.prompt_required("Enter the email of the student to update: ", "Email")?
        else {
            return Ok(Flow::Exit);
        };

        let current_names = match self.book.student(&email) {
            Some(student) => student.names.clone(),
            None => {
                let err = GradeBookError::StudentNotFound(email);
                self.status(err.to_string(), StatusKind::Error)?;
                return Ok(Flow::Continue);
            }
        };

        let Some(new_names) = self.read_line(&format!(
            "Enter new names for {current_names} (press Enter to keep current): "
        ))?
        else {
            return Ok(Flow::Exit);
        };
        let Some(new_email) = self.read_line(&format!(
            "Enter new email for {email} (press Enter to keep current): "
        ))?
        else {
            return Ok(Flow::Exit);
        };

        let new_names = input::optional(&new_names);
        let new_email = input::optional(&new_email);
        let result = self
            .book
            .update_student(&email, new_names.as_deref(), new_email.as_deref())
            .map(|_| ());
        if self.settle(result)?.is_some() {
            self.status("Student information updated successfully.", StatusKind::Info)?;
        }
        Ok(Flow::Continue)
    }

    fn delete_student(&mut self) -> Result<Flow> {
        let Some(email) =
            self.prompt_required("Enter the email of the student to delete: ", "Email")?
        else {
            return Ok(Flow::Exit);
        };

        let result = self.book.delete_student(&email).map(|_| ());
        if self.settle(result)?.is_some() {
            self.status("Student deleted successfully.", StatusKind::Info)?;
        }
        Ok(Flow::Continue)
    }

    fn view_student(&mut self) -> Result<Flow> {
        let Some(email) =
            self.prompt_required("Enter the email of the student to view: ", "Email")?
        else {
            return Ok(Flow::Exit);
        };

        let result = self.book.view_student(&email).map(student_report);
        if let Some(report) = self.settle(result)? {
            write!(self.output, "{report}").context("failed to write student")?;
        }
        Ok(Flow::Continue)
    }

    fn view_all_students(&mut self) -> Result<Flow> {
        let result = self.book.view_all_students();
        if let Some(rows) = self.settle(result)? {
            write!(self.output, "{}", student_rows_table(&rows))
                .context("failed to write students")?;
        }
        Ok(Flow::Continue)
    }

    /// Print the prompt and read one line. `None` means stdin is exhausted.
    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            writeln!(self.output).context("failed to write newline")?;
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Ask until the parser accepts the answer.
    fn prompt<T>(
        &mut self,
        label: &str,
        parse: impl Fn(&str) -> Result<T, InputError>,
    ) -> Result<Option<T>> {
        loop {
            let Some(raw) = self.read_line(label)? else {
                return Ok(None);
            };
            match parse(&raw) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => {
                    debug!(%err, "rejected input");
                    self.status(err.to_string(), StatusKind::Error)?;
                }
            }
        }
    }

    fn prompt_required(&mut self, label: &str, field: &'static str) -> Result<Option<String>> {
        self.prompt(label, |raw| input::required(field, raw))
    }

    /// Report recoverable grade book errors and keep going; storage failures
    /// end the session.
    fn settle<T>(&mut self, result: gradebook::Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                self.status(err.to_string(), StatusKind::Error)?;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn status(&mut self, text: impl Into<String>, kind: StatusKind) -> Result<()> {
        let text = text.into();
        if !self.colored {
            return writeln!(self.output, "{text}").context("failed to write status");
        }
        let styled = match kind {
            StatusKind::Info => text.green(),
            StatusKind::Error => text.red(),
        };
        writeln!(self.output, "{styled}").context("failed to write status")
    }
}
