//! Terminal output formatting with colors
//!
//! Colors follow `colored`'s global switch, which `main` sets from the
//! capability probe. These build strings; the caller picks the stream.

use colored::Colorize;

/// Width the first part of a title is padded to, so messages line up.
const TITLE_WIDTH: usize = 24;

/// Blue task title: first part space-prefixed and padded, empty parts dropped.
pub fn titleize(parts: &[&str]) -> String {
    let mut parts = parts.iter().copied();
    let Some(first) = parts.next() else {
        return String::new();
    };
    let head = format!("{:<width$}", format!(" {}", first), width = TITLE_WIDTH);
    std::iter::once(head.as_str())
        .chain(parts.filter(|p| !p.is_empty()))
        .collect::<Vec<_>>()
        .join(" ")
        .blue()
        .to_string()
}

/// Fatal error (red "Error:" prefix)
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{} {}", "Error:".red(), msg)
}

/// Success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{} {}", "✓".green(), msg)
}

/// Warning (yellow "Note:" prefix)
pub fn note(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("{} {}", "Note:".yellow(), msg)
}

/// Indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("  {}", msg)
}
