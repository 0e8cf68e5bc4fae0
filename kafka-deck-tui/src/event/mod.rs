//! Event layer: terminal input in, [`AppMessage`](crate::message::AppMessage)s out
//!
//! ```text
//!  crossterm ──poll_event──▶ handle_event ──▶ AppMessage ──▶ update
//!  workers ──UiScheduler──▶ UiQueue::drain (once per tick, UI thread) ──▶ update
//! ```

mod handler;
mod keymap;
mod ui_queue;

pub use handler::{handle_event, poll_event};
pub use keymap::{DefaultKeymap, KeyBinding};
pub use ui_queue::{UiQueue, UiScheduler};
