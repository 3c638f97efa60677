//! Terminal record browser
//!
//! Raw keystroke decoding, terminal mode control, frame rendering and the
//! browser state machine that ties them to the record store.

pub mod app;
pub mod input;
pub mod terminal;
pub mod theme;
pub mod ui;

pub use app::{Browser, BrowserState, SessionEnd};
pub use terminal::{CrosstermTerminal, RawTerminal};
