//! Ayu color theme and styling functions for bitgugs CLI output.
//!
//! Uses the Ayu Dark color palette.
//! Color source: <https://github.com/ayu-theme/ayu-colors>
//!
//! Statuses are free-form text, so only a few well-known words get color;
//! anything else is printed as is.

use owo_colors::OwoColorize;

use crate::terminal::supports_color;

// ---------------------------------------------------------------------------
// Ayu Dark color palette (RGB values)
// ---------------------------------------------------------------------------

const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue

const STATUS_ACTIVE: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - yellow
const STATUS_CLOSED: (u8, u8, u8) = (0x80, 0x90, 0xa0); // #8090a0 - dimmed
const STATUS_BLOCKED: (u8, u8, u8) = (0xf2, 0x6d, 0x78); // #f26d78 - red

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    paint(s, rgb, false, supports_color())
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    paint(s, rgb, true, supports_color())
}

fn paint(s: &str, rgb: (u8, u8, u8), bold: bool, enabled: bool) -> String {
    match (enabled, bold) {
        (false, _) => s.to_string(),
        (true, false) => s.truecolor(rgb.0, rgb.1, rgb.2).to_string(),
        (true, true) => s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Semantic render helpers
// ---------------------------------------------------------------------------

/// Renders text with warning (yellow) styling.
pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

/// Renders an issue id.
pub fn render_id(id: &str) -> String {
    color_bold_str(id, ACCENT)
}

/// Renders a field name in `list` and `show --meta` output.
pub fn render_field(name: &str) -> String {
    color_str(name, MUTED)
}

/// Renders the header of one blame event.
pub fn render_event_header(s: &str) -> String {
    color_bold_str(s, ACCENT)
}

/// Palette entry for a status word, `None` for standard text.
fn status_color(status: &str) -> Option<(u8, u8, u8)> {
    match status.trim().to_ascii_lowercase().as_str() {
        "closed" | "done" | "fixed" | "wontfix" => Some(STATUS_CLOSED),
        "assigned" | "in-progress" | "in_progress" | "started" => Some(STATUS_ACTIVE),
        "blocked" => Some(STATUS_BLOCKED),
        _ => None,
    }
}

/// Renders a status with semantic coloring.
/// Active and blocked work gets color, closed work is dimmed, anything
/// else uses standard text.
pub fn render_status(status: &str) -> String {
    match status_color(status) {
        Some(rgb) => color_str(status, rgb),
        None => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn paint_disabled_is_plain() {
        assert_eq!(paint("1001", ACCENT, true, false), "1001");
    }

    #[test]
    fn paint_enabled_wraps_in_escapes() {
        let painted = paint("closed", STATUS_CLOSED, false, true);
        assert!(painted.contains("closed"));
        assert!(painted.starts_with('\u{1b}'));
    }

    #[test]
    fn known_statuses_get_color() {
        assert_eq!(status_color("closed"), Some(STATUS_CLOSED));
        assert_eq!(status_color("Assigned"), Some(STATUS_ACTIVE));
        assert_eq!(status_color("blocked"), Some(STATUS_BLOCKED));
        assert_eq!(status_color("created"), None);
    }

    #[test]
    fn render_keeps_text() {
        assert!(render_status("created").contains("created"));
        assert!(render_id("7001").contains("7001"));
        assert!(render_field("assignee").contains("assignee"));
    }
}
