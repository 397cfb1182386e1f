use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Row, Table, Widget};

use crate::models::{Student, StudentRow, Transcript};

/// Gap between columns.
const COLUMN_SPACING: u16 = 2;

/// Display width of a cell, clamped to what a terminal buffer can address.
fn display_width(text: &str) -> u16 {
    u16::try_from(Span::raw(text).width()).unwrap_or(u16::MAX)
}

/// Render a bordered table off-screen and flatten it to plain text lines.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<u16> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| display_width(cell))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let columns = u16::try_from(widths.len().saturating_sub(1)).unwrap_or(u16::MAX);
    let gaps = COLUMN_SPACING.saturating_mul(columns);
    let width = widths
        .iter()
        .fold(gaps, |total, w| total.saturating_add(*w))
        .saturating_add(2);
    let height = u16::try_from(rows.len())
        .unwrap_or(u16::MAX)
        .saturating_add(3);
    let area = Rect::new(0, 0, width, height);

    let table = Table::new(
        rows.iter().map(|row| Row::new(row.iter().cloned())),
        widths.iter().map(|w| Constraint::Length(*w)),
    )
    .header(Row::new(headers.iter().copied()))
    .column_spacing(COLUMN_SPACING)
    .block(Block::bordered());

    let mut buffer = Buffer::empty(area);
    table.render(area, &mut buffer);

    // Wide glyphs occupy several cells; the trailing ones are padding.
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        let mut x = area.left();
        while x < area.right() {
            let symbol = buffer[(x, y)].symbol();
            line.push_str(symbol);
            x = x.saturating_add(display_width(symbol).max(1));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub(crate) fn format_gpa(gpa: f64) -> String {
    format!("{gpa:.2}")
}

pub(crate) fn ranking_table(ranked: &[&Student]) -> String {
    let rows: Vec<Vec<String>> = ranked
        .iter()
        .enumerate()
        .map(|(idx, student)| {
            vec![
                (idx + 1).to_string(),
                student.email.clone(),
                student.names.clone(),
                format_gpa(student.gpa()),
            ]
        })
        .collect();
    render_table(&["Rank", "Email", "Names", "GPA"], &rows)
}

pub(crate) fn student_rows_table(students: &[StudentRow]) -> String {
    let rows: Vec<Vec<String>> = students
        .iter()
        .map(|s| vec![s.email.clone(), s.names.clone(), format_gpa(s.gpa)])
        .collect();
    render_table(&["Email", "Names", "GPA"], &rows)
}

pub(crate) fn transcript_report(transcript: &Transcript) -> String {
    let rows: Vec<Vec<String>> = transcript
        .lines
        .iter()
        .map(|line| {
            vec![
                line.course_name.clone(),
                line.trimester.clone().unwrap_or_default(),
                line.credits.map(|c| c.to_string()).unwrap_or_default(),
                line.grade.to_string(),
            ]
        })
        .collect();

    format!(
        "Transcript for {} ({}):\n{}GPA: {}\n",
        transcript.names,
        transcript.email,
        render_table(&["Course Name", "Trimester", "Credits", "Grade"], &rows),
        format_gpa(transcript.gpa)
    )
}

pub(crate) fn student_report(student: &Student) -> String {
    let rows: Vec<Vec<String>> = student
        .registrations()
        .iter()
        .map(|reg| {
            vec![
                reg.course.name.clone(),
                reg.course.trimester.clone(),
                reg.grade.to_string(),
            ]
        })
        .collect();

    format!(
        "Student Information for {} ({}):\nCourses Registered:\n{}GPA: {}\n",
        student.names,
        student.email,
        render_table(&["Course Name", "Trimester", "Grade"], &rows),
        format_gpa(student.gpa())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TranscriptLine;

    #[test]
    fn table_has_border_header_and_rows() {
        let out = render_table(
            &["Email", "GPA"],
            &[vec!["a@x.com".to_string(), "3.50".to_string()]],
        );
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Email") && lines[1].contains("GPA"));
        assert!(lines[2].contains("a@x.com") && lines[2].contains("3.50"));
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn wide_characters_stay_intact_and_aligned() {
        let out = render_table(
            &["Names", "GPA"],
            &[
                vec!["王小明".to_string(), "3.50".to_string()],
                vec!["Bob".to_string(), "2.00".to_string()],
            ],
        );
        let lines: Vec<&str> = out.lines().collect();

        assert!(out.contains("王小明"));
        let width = Span::raw(lines[0]).width();
        assert!(lines.iter().all(|l| Span::raw(*l).width() == width));
    }

    #[test]
    fn width_never_overflows() {
        assert_eq!(display_width(&"x".repeat(70_000)), u16::MAX);

        let huge = "y".repeat(40_000);
        let out = render_table(&["A", "B"], &[vec![huge.clone(), huge]]);
        assert!(out.lines().count() > 0);
    }

    #[test]
    fn empty_table_still_shows_headers() {
        let out = render_table(&["Course Name", "Grade"], &[]);
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("Course Name"));
    }

    #[test]
    fn transcript_tolerates_missing_courses() {
        let report = transcript_report(&Transcript {
            email: "a@x.com".into(),
            names: "Alice".into(),
            gpa: 3.5,
            lines: vec![TranscriptLine {
                course_name: "GONE".into(),
                trimester: None,
                credits: None,
                grade: 3.5,
            }],
        });
        assert!(report.starts_with("Transcript for Alice (a@x.com):"));
        assert!(report.contains("GONE"));
        assert!(report.trim_end().ends_with("GPA: 3.50"));
    }

    #[test]
    fn ranking_numbers_rows_from_one() {
        let mut best = Student::new("b@x.com", "Bob");
        best.register(
            crate::models::Course {
                name: "C".into(),
                trimester: "T1".into(),
                credits: 1,
            },
            4.0,
        );
        let rest = Student::new("a@x.com", "Alice");

        let out = ranking_table(&[&best, &rest]);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[2].contains("1") && lines[2].contains("b@x.com"));
        assert!(lines[3].contains("2") && lines[3].contains("a@x.com"));
    }
}
