//! Terminal styling for bitgugs output.
//!
//! Colour is applied only when stdout is a terminal and the usual
//! `NO_COLOR` / `CLICOLOR` conventions allow it.

pub mod styles;
pub mod terminal;
