//! Binary entry point: bring up the data directory and log file, open the
//! SQLite store, hydrate the grade book, and run the menu on stdin/stdout.
use std::io;

use crossterm::tty::IsTty;

use grade_book::{db, logging, Config, Console, GradeBook};

/// Returning a `Result` bubbles fatal storage problems up to the terminal
/// instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let config = Config::resolve()?;
    config.ensure_data_dir()?;
    logging::init_tracing(&config)?;

    let conn = db::open(&config.db_path())?;
    let book = GradeBook::load(conn)?;

    let stdin = io::stdin();
    let colored = io::stdout().is_tty();
    let mut console = Console::new(book, stdin.lock(), io::stdout()).with_color(colored);
    let result = console.run();
    if let Err(err) = &result {
        tracing::error!(error = %err, "session ended with a storage error");
    }
    result
}
