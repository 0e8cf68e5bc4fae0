//! View layer: read-only rendering of `App`
//!
//! ```text
//! ┌ title: version │ active broker ──────────────────────────────┐
//! │ [1] Brokers         │                                       │
//! │ [2] Topics          │  detail of the focused sidebar panel, │
//! │ [3] Consumer Groups │  or the message browser / detail      │
//! │ [4] Schema Registry │                                       │
//! └ status: key hints, notices, errors ─────────────────────────┘
//! ```
//!
//! Panels are drawn from `PanelViewModel::{title, display_rows, selected_index}`
//! only; the view never reaches into view-model internals. Modals are drawn last.

mod components;
mod layout;
pub mod theme;

use ratatui::Frame;

use crate::model::App;

pub fn render(app: &App, frame: &mut Frame) {
    layout::render(app, frame);
}
