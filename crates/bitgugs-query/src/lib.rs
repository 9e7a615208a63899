//! Query language used by `bitgugs list` to filter issues.

pub mod expr;

pub use expr::{Expr, matches};
