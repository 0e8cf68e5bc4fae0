//! Terminal setup and teardown

use std::io::{self, Stdout};
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode plus alternate screen.
pub fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Must run on every exit path, or the shell is left in raw mode.
pub fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn resume_terminal(terminal: &mut Term) -> Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(())
}

/// Leave the TUI, run `$EDITOR` on `path`, then take the screen back.
///
/// The terminal is resumed even when the editor cannot be launched.
pub fn edit_file(terminal: &mut Term, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let (program, args) = editor_command(std::env::var("EDITOR").ok().as_deref());

    restore_terminal(terminal)?;
    let status = Command::new(&program).args(&args).arg(path).status();
    resume_terminal(terminal)?;

    let status = status.with_context(|| format!("launching {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}

/// `$EDITOR` split into program and arguments; `vi` when unset or blank.
fn editor_command(var: Option<&str>) -> (String, Vec<String>) {
    let mut parts = var.unwrap_or_default().split_whitespace().map(str::to_string);
    match parts.next() {
        Some(program) => (program, parts.collect()),
        None => ("vi".to_string(), Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_defaults_to_vi() {
        assert_eq!(editor_command(None), ("vi".to_string(), Vec::new()));
        assert_eq!(editor_command(Some("  ")), ("vi".to_string(), Vec::new()));
    }

    #[test]
    fn editor_arguments_are_kept() {
        let (program, args) = editor_command(Some("code --wait"));
        assert_eq!(program, "code");
        assert_eq!(args, vec!["--wait".to_string()]);
    }
}
