//! Issue identifiers and file names.
//!
//! Issue files are named `<id>-<slug>.txt`. Automatically assigned ids are
//! numeric and grow by one from the largest numeric id already present.

/// File extension of issue records.
pub const ISSUE_EXTENSION: &str = ".txt";

/// First id handed out when no numeric issue exists yet.
pub const DEFAULT_FIRST_ID: u64 = 1001;

/// Builds the slug for a title: words joined with `-`, lower-cased.
///
/// Each argument word is further split on whitespace so that a quoted
/// multi-word title slugs the same as separate words. Path separators are
/// replaced so the slug always names a file inside the issue directory.
pub fn slugify<S: AsRef<str>>(title_words: &[S]) -> String {
    title_words
        .iter()
        .flat_map(|w| w.as_ref().split_whitespace())
        .map(|w| w.replace(['/', '\\'], "-").to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Builds the file name `<id>-<slug>.txt`.
pub fn issue_file_name<S: AsRef<str>>(id: &str, title_words: &[S]) -> String {
    format!("{id}-{}{ISSUE_EXTENSION}", slugify(title_words))
}

/// Returns the id portion of an issue file name (everything before the
/// first `-`), or `None` if the name has no id prefix.
pub fn id_prefix(file_name: &str) -> Option<&str> {
    match file_name.split_once('-') {
        Some((prefix, _)) if !prefix.is_empty() => Some(prefix),
        _ => None,
    }
}

/// Parses the numeric id of an issue file name, if it has one.
pub fn numeric_id(file_name: &str) -> Option<u64> {
    id_prefix(file_name)?.parse().ok()
}

/// Computes the next automatic id from existing file names.
///
/// Returns `max + 1` over every numeric id prefix, or `first_id` when there
/// is none. Non-numeric ids are ignored.
pub fn next_id<I, S>(file_names: I, first_id: u64) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    file_names
        .into_iter()
        .filter_map(|name| numeric_id(name.as_ref()))
        .max()
        .map_or(first_id, |max| max + 1)
        .to_string()
}

/// Checks whether `id` is usable as an issue id.
///
/// Ids become file name prefixes and glob patterns, so they may not be empty
/// and may not contain whitespace, path separators or glob metacharacters.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '*' | '?' | '[' | ']'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slug_is_lowercase_hyphen_joined() {
        assert_eq!(slugify(&["Fix", "Crash", "On", "Start"]), "fix-crash-on-start");
    }

    #[test]
    fn quoted_title_slugs_like_separate_words() {
        assert_eq!(slugify(&["Fix crash"]), slugify(&["Fix", "crash"]));
        assert_eq!(issue_file_name("7001", &["Fix crash"]), "7001-fix-crash.txt");
    }

    #[test]
    fn slug_is_deterministic() {
        let words = ["Some", "Title"];
        assert_eq!(slugify(&words), slugify(&words));
    }

    #[test]
    fn slug_replaces_path_separators() {
        assert_eq!(slugify(&["read/write", "bug"]), "read-write-bug");
    }

    #[test]
    fn numeric_id_parses_prefix() {
        assert_eq!(numeric_id("1001-a.txt"), Some(1001));
        assert_eq!(numeric_id("x-c.txt"), None);
        assert_eq!(numeric_id("-c.txt"), None);
        assert_eq!(numeric_id("noid.txt"), None);
    }

    #[test]
    fn next_id_is_max_plus_one() {
        let names = ["1001-a.txt", "1003-b.txt", "x-c.txt"];
        assert_eq!(next_id(names, DEFAULT_FIRST_ID), "1004");
    }

    #[test]
    fn next_id_starts_at_first_id() {
        assert_eq!(next_id(Vec::<String>::new(), DEFAULT_FIRST_ID), "1001");
        assert_eq!(next_id(["x-c.txt"], 1), "1");
    }

    #[test]
    fn valid_ids() {
        assert!(is_valid_id("1001"));
        assert!(is_valid_id("ui.7"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("a b"));
        assert!(!is_valid_id("../x"));
        assert!(!is_valid_id("10*"));
    }
}
