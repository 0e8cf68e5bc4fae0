//! Main loop
//!
//! ```text
//! loop {
//!     for msg in queue.drain() { update(app, msg) }     // background results, UI thread
//!     if app.should_quit { break }
//!     if app.take_edit_request() { edit_file(profiles); reload profiles }
//!     if app.redraw.take() { terminal.draw(view::render) }
//!     if let Some(event) = poll_event(tick_rate) {      // waits up to one tick
//!         update(app, handle_event(event, app))
//!     }
//! }
//! ```
//!
//! Drawing only happens when something marked the redraw flag, so bursts of
//! notifications from one drain collapse into a single frame.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use crate::event::{self, UiQueue};
use crate::message::AppMessage;
use crate::model::App;
use crate::update;
use crate::util::{self, Term};
use crate::view;

pub fn run(
    terminal: &mut Term,
    app: &mut App,
    queue: &mut UiQueue,
    tick_rate: Duration,
    profiles_path: &Path,
) -> Result<()> {
    app.redraw.mark();

    loop {
        for msg in queue.drain() {
            update::update(app, msg);
        }

        if app.should_quit {
            break;
        }

        if app.take_edit_request() {
            match util::edit_file(terminal, profiles_path) {
                Ok(()) => app.set_status("Reloading broker profiles"),
                Err(e) => {
                    tracing::error!(error = %format!("{e:#}"), "external editor failed");
                    app.set_error(format!("editor failed: {e:#}"));
                }
            }
            drop(app.main.load_initial_data());
            app.redraw.mark();
        }

        if app.redraw.take() {
            terminal.draw(|frame| view::render(app, frame))?;
        }

        if let Some(event) = event::poll_event(tick_rate)? {
            let msg = event::handle_event(event, app);
            if !matches!(msg, AppMessage::Noop) {
                app.redraw.mark();
            }
            update::update(app, msg);
        }
    }

    Ok(())
}
