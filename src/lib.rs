//! Core library surface for the Grade Book application.
//!
//! The binary only wires these pieces together: resolve where data lives,
//! start logging, open the store, and hand a loaded `GradeBook` to the
//! console menu.
pub mod config;
pub mod db;
pub mod gradebook;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::Config;
pub use gradebook::{GradeBook, GradeBookError};
pub use models::{Course, Registration, Student, StudentRow, Transcript, TranscriptLine};
pub use ui::Console;
