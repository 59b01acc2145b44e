//! Terminal styling collaborator.
//!
//! Uses the anstyle ecosystem, the same way the teacher project does:
//! - `anstream` for auto-detecting color support
//! - `anstyle` for composable styling
//! - `color-print`'s `cformat!` for semantic, HTML-tag-like message styling
//!
//! Unstyled fallback is automatic: `anstream` downgrades to plain text when
//! stdout/stderr are not a terminal or the user has NO_COLOR set, so every
//! helper in this module is safe to call unconditionally.
//!
//! ## stdout vs stderr
//!
//! `println!`/`print!` (primary output, e.g. a command's captured stdout) go
//! to stdout; the message helpers below (`error_message`, `success_message`,
//! ...) are meant for `eprintln!` — status/progress chatter that should not
//! interleave with data a caller might pipe.

mod constants;

pub use anstream::{eprintln, println};
pub use constants::*;

use std::sync::atomic::{AtomicU8, Ordering};

/// Global verbosity level, set once at startup from `-v`/`-vv`.
static VERBOSITY: AtomicU8 = AtomicU8::new(0);

/// Set the global verbosity level. Call once at startup after parsing CLI args.
pub fn set_verbosity(level: u8) {
    VERBOSITY.store(level, Ordering::Relaxed);
}

/// Current verbosity level: 0 normal, 1 verbose (`-v`), 2+ debug (`-vv`).
pub fn verbosity() -> u8 {
    VERBOSITY.load(Ordering::Relaxed)
}

/// Terminal width, or `usize::MAX` if detection fails (piped context, no TTY).
///
/// Checks stderr first (status messages are the common case here), then
/// stdout, then falls back to `COLUMNS`.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) =
        terminal_size::terminal_size_of(std::io::stderr()).or_else(terminal_size::terminal_size)
    {
        return w as usize;
    }

    if let Ok(cols) = std::env::var("COLUMNS")
        && let Ok(width) = cols.parse::<usize>()
    {
        return width;
    }

    usize::MAX
}

/// Visual width of a string, ignoring ANSI escape codes.
pub fn visual_width(s: &str) -> usize {
    use unicode_width::UnicodeWidthStr;
    strip_ansi(s).width()
}

/// Strip ANSI escape sequences (`ESC [ ... letter`) from a string.
fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}
