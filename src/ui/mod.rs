//! Ratatui front-end: a record list on the left, the selected customer's
//! details on the right, and modal forms for insert, edit, search, and
//! delete confirmation.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
