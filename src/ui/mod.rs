//! Line-oriented terminal frontend.
//!
//! - `settings`: glyphs, labels and colors
//! - `markdown`: assistant message flattening
//! - `terminal`: the [`crate::app::Frontend`] implementation

pub mod markdown;
pub mod settings;
pub mod terminal;

pub use terminal::TerminalFrontend;
