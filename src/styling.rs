//! Minimal terminal styling for CLI diagnostics.
//!
//! Mirrors the semantic color mapping used by the broader toolchain this
//! crate was built alongside: errors in red, hints dimmed, progress in cyan.
//! Unlike a TUI, this binary only ever prints a handful of status lines, so
//! there is no table rendering or width-aware wrapping here.

use color_print::cformat;

pub use anstream::{eprintln, println};

pub const ERROR_EMOJI: &str = "\u{274c}";
pub const WARNING_EMOJI: &str = "\u{1f7e1}";
pub const HINT_EMOJI: &str = "\u{1f4a1}";
pub const SUCCESS_EMOJI: &str = "\u{2705}";

/// Format an error message with emoji and red styling.
pub fn error_message(content: impl AsRef<str>) -> String {
    cformat!("{ERROR_EMOJI} <red>{}</>", content.as_ref())
}

/// Format a hint message with emoji and dim styling.
pub fn hint_message(content: impl AsRef<str>) -> String {
    cformat!("{HINT_EMOJI} <dim>{}</>", content.as_ref())
}

/// Format a warning message with emoji and yellow styling.
pub fn warning_message(content: impl AsRef<str>) -> String {
    cformat!("{WARNING_EMOJI} <yellow>{}</>", content.as_ref())
}

/// Format a success message with emoji and green styling.
pub fn success_message(content: impl AsRef<str>) -> String {
    cformat!("{SUCCESS_EMOJI} <green>{}</>", content.as_ref())
}
