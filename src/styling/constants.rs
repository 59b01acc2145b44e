//! Message emojis and the canonical `cformat!`-based message formatters.
//!
//! Semantic mapping:
//! - Errors: `<red>...</>`
//! - Warnings: `<yellow>...</>`
//! - Hints: `<dim>...</>`
//! - Progress: `<cyan>...</>`
//! - Success: `<green>...</>`

use color_print::cformat;

pub const PROGRESS_EMOJI: &str = "\u{1f504}";
pub const SUCCESS_EMOJI: &str = "\u{2705}";
pub const ERROR_EMOJI: &str = "\u{274c}";
pub const WARNING_EMOJI: &str = "\u{1f7e1}";
pub const HINT_EMOJI: &str = "\u{1f4a1}";
pub const INFO_EMOJI: &str = "\u{26aa}";

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

/// Format a progress message with emoji and cyan styling.
pub fn progress_message(content: impl AsRef<str>) -> String {
    cformat!("{PROGRESS_EMOJI} <cyan>{}</>", content.as_ref())
}

/// Format an info message with emoji (no color — neutral status).
pub fn info_message(content: impl AsRef<str>) -> String {
    cformat!("{INFO_EMOJI} {}", content.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emoji_constants() {
        assert_eq!(PROGRESS_EMOJI, "\u{1f504}");
        assert_eq!(SUCCESS_EMOJI, "\u{2705}");
    }

    #[test]
    fn test_success_message_contains_content() {
        let msg = success_message("done");
        assert!(msg.contains("done"));
        assert!(msg.contains(SUCCESS_EMOJI));
    }

    #[test]
    fn test_warning_message_contains_content() {
        let msg = warning_message("careful");
        assert!(msg.contains("careful"));
        assert!(msg.contains(WARNING_EMOJI));
    }
}
