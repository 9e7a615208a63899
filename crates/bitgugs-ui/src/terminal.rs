//! Terminal detection utilities.

use std::env;

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Determines if ANSI color codes should be used.
///
/// Respects standard conventions:
/// - `NO_COLOR` (any value): disables color (<https://no-color.org/>)
/// - `CLICOLOR=0`: disables color
/// - `TERM=dumb`: disables color
/// - `CLICOLOR_FORCE` (any value): forces color even in non-TTY
/// - Falls back to TTY detection
pub fn supports_color() -> bool {
    color_from_env(|key| env::var(key).ok(), is_tty)
}

fn color_from_env(var: impl Fn(&str) -> Option<String>, tty: impl FnOnce() -> bool) -> bool {
    if var("NO_COLOR").is_some() {
        return false;
    }
    if var("CLICOLOR").as_deref() == Some("0") {
        return false;
    }
    if var("TERM").as_deref() == Some("dumb") {
        return false;
    }
    if var("CLICOLOR_FORCE").is_some() {
        return true;
    }
    tty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn no_color_wins_over_force() {
        let var = env_of(&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")]);
        assert!(!color_from_env(var, || true));
    }

    #[test]
    fn dumb_terminal_disables_color() {
        assert!(!color_from_env(env_of(&[("TERM", "dumb")]), || true));
        assert!(!color_from_env(env_of(&[("CLICOLOR", "0")]), || true));
    }

    #[test]
    fn force_enables_color_without_tty() {
        assert!(color_from_env(env_of(&[("CLICOLOR_FORCE", "1")]), || false));
    }

    #[test]
    fn falls_back_to_tty_detection() {
        assert!(color_from_env(env_of(&[]), || true));
        assert!(!color_from_env(env_of(&[]), || false));
    }
}
