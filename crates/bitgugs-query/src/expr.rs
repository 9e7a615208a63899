//! Field-match expressions.
//!
//! A query is a flat list of words. The words `or`, `and` and `not` are
//! operators, everything else is a term matched as a case-sensitive
//! substring. Parsing splits the list at the first `or`, otherwise at the
//! first `and`, otherwise strips a leading `not`; a plain list of terms
//! matches if any one of them occurs. There are no parentheses, and the
//! operator words cannot be searched for literally.

use std::fmt;

const OR: &str = "or";
const AND: &str = "and";
const NOT: &str = "not";

/// A parsed field-match query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Expr {
    /// The empty query; matches every value.
    #[default]
    Always,
    /// Substring match.
    Term(String),
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// Parses a token list.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
        if tokens.is_empty() {
            return Self::Always;
        }
        if let Some((left, right)) = split_at_word(tokens, OR) {
            return Self::Or(Box::new(Self::parse(left)), Box::new(Self::parse(right)));
        }
        if let Some((left, right)) = split_at_word(tokens, AND) {
            return Self::And(Box::new(Self::parse(left)), Box::new(Self::parse(right)));
        }
        if tokens[0].as_ref() == NOT {
            return Self::Not(Box::new(Self::parse(&tokens[1..])));
        }

        tokens
            .iter()
            .map(|t| Self::Term(t.as_ref().to_string()))
            .reduce(|acc, term| Self::Or(Box::new(acc), Box::new(term)))
            .unwrap_or(Self::Always)
    }

    /// Parses a whitespace-separated query string such as `"not closed"`.
    pub fn from_words(query: &str) -> Self {
        let tokens: Vec<&str> = query.split_whitespace().collect();
        Self::parse(&tokens)
    }

    /// Evaluates the expression against `value`.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Always => true,
            Self::Term(term) => value.contains(term.as_str()),
            Self::Or(left, right) => left.matches(value) || right.matches(value),
            Self::And(left, right) => left.matches(value) && right.matches(value),
            Self::Not(inner) => !inner.matches(value),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("*"),
            Self::Term(term) => write!(f, "{term:?}"),
            Self::Or(left, right) => write!(f, "({left} or {right})"),
            Self::And(left, right) => write!(f, "({left} and {right})"),
            Self::Not(inner) => write!(f, "not {inner}"),
        }
    }
}

/// Splits `tokens` around the first occurrence of `word`.
fn split_at_word<'a, S: AsRef<str>>(tokens: &'a [S], word: &str) -> Option<(&'a [S], &'a [S])> {
    let idx = tokens.iter().position(|t| t.as_ref() == word)?;
    Some((&tokens[..idx], &tokens[idx + 1..]))
}

/// Convenience wrapper: parses `tokens` and matches `value`.
pub fn matches<S: AsRef<str>>(value: &str, tokens: &[S]) -> bool {
    Expr::parse(tokens).matches(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NO_TOKENS: [&str; 0] = [];

    #[test]
    fn single_term_is_substring_match() {
        assert!(matches("hello world", &["hello"]));
        assert!(!matches("hello world", &["Hello"]));
    }

    #[test]
    fn not_negates_rest() {
        assert!(!matches("hello world", &["not", "hello"]));
        assert!(matches("closed later", &["not", "open"]));
    }

    #[test]
    fn or_and_and() {
        assert!(matches("hello world", &["foo", "or", "world"]));
        assert!(!matches("hello world", &["foo", "and", "world"]));
        assert!(matches("hello world", &["hello", "and", "world"]));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(matches("", &NO_TOKENS));
        assert!(matches("anything", &NO_TOKENS));
        assert_eq!(Expr::from_words("   "), Expr::Always);
    }

    #[test]
    fn plain_term_list_means_any() {
        assert!(matches("hello world", &["foo", "world"]));
        assert!(!matches("hello world", &["foo", "bar"]));
    }

    #[test]
    fn or_binds_looser_than_and() {
        // a and b or c  ==  (a and b) or c
        let expr = Expr::parse(&["a", "and", "b", "or", "c"]);
        assert_eq!(
            expr,
            Expr::Or(
                Box::new(Expr::And(
                    Box::new(Expr::Term("a".into())),
                    Box::new(Expr::Term("b".into())),
                )),
                Box::new(Expr::Term("c".into())),
            )
        );
        assert!(expr.matches("c"));
        assert!(expr.matches("ab"));
        assert!(!expr.matches("a"));
    }

    #[test]
    fn not_applies_inside_split_sides() {
        // not a or b  ==  (not a) or b
        let expr = Expr::parse(&["not", "a", "or", "b"]);
        assert!(expr.matches("ab"));
        assert!(!expr.matches("a"));
        assert!(expr.matches("x"));
    }

    #[test]
    fn default_status_filter() {
        let expr = Expr::from_words("not closed");
        assert!(expr.matches("created"));
        assert!(expr.matches("assigned"));
        assert!(!expr.matches("closed"));
    }

    #[test]
    fn empty_sides_of_operators() {
        assert!(matches("anything", &["or", "x"]));
        assert!(matches("x", &["and", "x"]));
        assert!(!matches("y", &["and", "x"]));
        assert!(!matches("anything", &["not"]));
    }

    #[test]
    fn operator_words_are_never_terms() {
        // Searching for the literal word "and" is not expressible.
        assert!(matches("nothing here", &["and"]));
    }

    #[test]
    fn display_shows_structure() {
        let expr = Expr::parse(&["not", "closed", "or", "reopened"]);
        assert_eq!(expr.to_string(), "(not \"closed\" or \"reopened\")");
    }
}
