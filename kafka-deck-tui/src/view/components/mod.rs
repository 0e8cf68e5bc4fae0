pub mod modal;
pub mod panel;
pub mod statusbar;
