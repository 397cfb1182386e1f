use std::io::Cursor;

use grade_book::db;
use grade_book::{Console, GradeBook};
use speculate2::speculate;

/// Feed a scripted session to the console and return the final grade book
/// plus everything printed.
fn run_session(book: GradeBook, script: &str) -> (GradeBook, String) {
    let mut console = Console::new(book, Cursor::new(script.to_string()), Vec::new());
    console.run().expect("Session failed");
    let (book, output) = console.into_parts();
    (book, String::from_utf8(output).expect("Output was not UTF-8"))
}

speculate! {
    before {
        let book = GradeBook::load(db::open_in_memory().expect("Failed to open db"))
            .expect("Failed to load grade book");
    }

    describe "main menu" {
        it "greets the user and exits on 10" {
            let (_, out) = run_session(book, "10\n");
            assert!(out.contains("Welcome to Grade Book App"));
            assert!(out.contains("10. Exit"));
        }

        it "stops cleanly when input runs out" {
            let (_, out) = run_session(book, "");
            assert!(out.contains("Choose an option: "));
        }

        it "rejects unknown options and keeps going" {
            let (_, out) = run_session(book, "42\n10\n");
            assert!(out.contains("Invalid option, please try again."));
        }

        it "writes plain status lines when output is not a terminal" {
            let (_, out) = run_session(book, "42\n1\na@x.com\nAlice\n10\n");
            assert!(out.contains("Invalid option, please try again.\n"));
            assert!(out.contains("Student added successfully.\n"));
            assert!(!out.contains('\u{1b}'));
        }
    }

    describe "adding and registering" {
        it "walks the Alice scenario end to end" {
            let script = "1\na@x.com\nAlice\n\
                          2\nCS101\nT1\n4\n\
                          3\na@x.com\nCS101\n3.5\n\
                          2\nCS102\nT1\n2\n\
                          3\na@x.com\nCS102\n4.0\n\
                          10\n";
            let (book, out) = run_session(book, script);

            assert!(out.contains("Student added successfully."));
            assert!(out.contains("Course added successfully."));
            assert!(out.contains("Registered Alice for CS101 with grade 3.5."));
            let gpa = book.student("a@x.com").unwrap().gpa();
            assert!((gpa - 22.0 / 6.0).abs() < 1e-9);
        }

        it "re-prompts on malformed numbers instead of failing" {
            let script = "2\nCS101\nT1\nfour\n0\n4\n10\n";
            let (book, out) = run_session(book, script);

            assert!(out.contains("Credits must be a whole number, got 'four'."));
            assert!(out.contains("Credits must be positive, got 0."));
            assert_eq!(book.course("CS101").unwrap().credits, 4);
        }

        it "reports a missing student or course" {
            let script = "3\nghost@x.com\nCS101\n3.0\n10\n";
            let (book, out) = run_session(book, script);

            assert!(out.contains("Student ghost@x.com not found."));
            assert!(book.students().is_empty());
        }
    }

    describe "reports" {
        before {
            let script_setup = "1\na@x.com\nAlice\n\
                                1\nb@x.com\nBob\n\
                                2\nCS101\nT1\n4\n\
                                3\na@x.com\nCS101\n2.0\n\
                                3\nb@x.com\nCS101\n4.0\n";
        }

        it "ranks by GPA" {
            let (_, out) = run_session(book, &format!("{script_setup}4\n10\n"));
            let ranking = out.split("Ranking of students by GPA:").nth(1).unwrap();
            let bob = ranking.find("b@x.com").unwrap();
            let alice = ranking.find("a@x.com").unwrap();
            assert!(bob < alice);
        }

        it "re-asks when the GPA bounds are inverted" {
            let (_, out) = run_session(book, &format!("{script_setup}5\n4\n1\n3\n5\n10\n"));
            assert!(out.contains("Minimum GPA 4 is greater than maximum GPA 1."));
            let results = out.split("Students with GPA in the specified range:").nth(1).unwrap();
            assert!(results.contains("b@x.com"));
            assert!(!results.contains("a@x.com"));
        }

        it "prints one transcript or all of them" {
            let (_, out) = run_session(book, &format!("{script_setup}6\nb@x.com\n6\n\n10\n"));
            assert_eq!(out.matches("Transcript for Bob (b@x.com):").count(), 2);
            assert_eq!(out.matches("Transcript for Alice (a@x.com):").count(), 1);
        }

        it "shows students from the view menu" {
            let (_, out) = run_session(book, &format!("{script_setup}9\n1\na@x.com\n2\n3\n10\n"));
            assert!(out.contains("Student Information for Alice (a@x.com):"));
            assert!(out.contains("View All Students"));
            assert!(out.contains("GPA: 2.00"));
        }
    }

    describe "updating and deleting" {
        it "keeps current values on blank answers" {
            let script = "1\na@x.com\nAlice\n7\na@x.com\n\n\n10\n";
            let (book, out) = run_session(book, script);

            assert!(out.contains("Student information updated successfully."));
            assert_eq!(book.student("a@x.com").unwrap().names, "Alice");
        }

        it "changes the email" {
            let script = "1\na@x.com\nAlice\n7\na@x.com\nAlicia\nalice@y.org\n10\n";
            let (book, _) = run_session(book, script);

            assert!(book.student("a@x.com").is_none());
            assert_eq!(book.student("alice@y.org").unwrap().names, "Alicia");
        }

        it "deletes and then cannot view the student" {
            let script = "1\na@x.com\nAlice\n8\na@x.com\n9\n1\na@x.com\n3\n10\n";
            let (book, out) = run_session(book, script);

            assert!(out.contains("Student deleted successfully."));
            assert!(out.contains("Student a@x.com not found."));
            assert!(book.view_all_students().unwrap().is_empty());
        }
    }
}
