//! Text front end: typed prompt parsing, report tables, and the numbered
//! menus.

mod console;
pub mod input;
mod table;

pub use console::Console;
pub use input::{GpaRange, InputError};
