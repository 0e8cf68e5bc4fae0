//! Util layer: terminal lifecycle and log installation
//!
//! ```text
//!     main ──▶ init_logging ──▶ init_terminal ──▶ app::run ──▶ restore_terminal
//! ```
//!
//! `restore_terminal` runs right after `app::run` returns, even on error, so the
//! shell never stays in raw mode. `edit_file` suspends the screen around an
//! external editor and resumes it afterwards.

mod logging;
mod terminal;

pub use logging::init_logging;
pub use terminal::{edit_file, init_terminal, restore_terminal, Term};
