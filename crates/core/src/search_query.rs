//! Tokenizer for the explore pages' search box.
//!
//! A query is a whitespace-separated list of fragments. Recognised operators:
//!
//! | Operator            | Meaning                                   |
//! |---------------------|-------------------------------------------|
//! | `tag:a,b`           | entity must carry every listed tag        |
//! | `serie:a,b`         | entity must belong to one of the series   |
//! | `title:a`           | serie name contains the value             |
//!
//! Multi-word values use `_` in place of a space (`tag:game_dev`). Anything
//! else is a plain term; plain terms are recognised but do not constrain
//! queries yet. Tokenizing never fails: fragments that match nothing are
//! dropped.

use std::sync::LazyLock;

use regex::Regex;

pub const TAG_OP: &str = "tag:";
pub const SERIE_OP: &str = "serie:";
pub const TITLE_OP: &str = "title:";

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"tag:[\w,]+|serie:[\w,]+|title:\w+|\w+").expect("valid regex")
});

/// One recognised fragment of a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Tag(Vec<String>),
    Serie(Vec<String>),
    Title(String),
    Term(String),
}

/// Structured constraints extracted from a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Lowercase tag names. Values accumulate across repeated `tag:` operators.
    pub tags: Vec<String>,
    /// Lowercase serie names. Values accumulate across repeated `serie:` operators.
    pub series: Vec<String>,
    /// Serie title fragment. The last `title:` operator wins.
    pub title: Option<String>,
}

impl SearchFilter {
    /// True when the filter imposes no constraint.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.series.is_empty() && self.title.is_none()
    }
}

/// Split a query into tokens. The input is lowercased first.
pub fn tokens(query: &str) -> Vec<Token> {
    let query = query.to_lowercase();
    TOKEN_RE
        .find_iter(&query)
        .filter_map(|m| classify(m.as_str()))
        .collect()
}

/// Parse a query into a [`SearchFilter`].
///
/// ```
/// use misite_core::search_query::tokenize;
///
/// let filter = tokenize("tag:go,rust serie:devlog");
/// assert_eq!(filter.tags, vec!["go", "rust"]);
/// assert_eq!(filter.series, vec!["devlog"]);
/// assert!(tokenize("hello").is_empty());
/// ```
pub fn tokenize(query: &str) -> SearchFilter {
    let mut filter = SearchFilter::default();
    for token in tokens(query) {
        match token {
            Token::Tag(values) => filter.tags.extend(values),
            Token::Serie(values) => filter.series.extend(values),
            Token::Title(value) => filter.title = Some(value),
            Token::Term(_) => {}
        }
    }
    filter
}

fn classify(fragment: &str) -> Option<Token> {
    if let Some(rest) = fragment.strip_prefix(TAG_OP) {
        let values = split_values(rest);
        return (!values.is_empty()).then_some(Token::Tag(values));
    }
    if let Some(rest) = fragment.strip_prefix(SERIE_OP) {
        let values = split_values(rest);
        return (!values.is_empty()).then_some(Token::Serie(values));
    }
    if let Some(rest) = fragment.strip_prefix(TITLE_OP) {
        return Some(Token::Title(unescape(rest)));
    }
    Some(Token::Term(fragment.to_string()))
}

fn split_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|v| !v.is_empty())
        .map(unescape)
        .collect()
}

/// `_` stands for a space inside operator values.
fn unescape(value: &str) -> String {
    value.replace('_', " ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_and_serie_operators() {
        let filter = tokenize("tag:a,b serie:c");
        assert_eq!(
            filter,
            SearchFilter {
                tags: vec!["a".into(), "b".into()],
                series: vec!["c".into()],
                title: None,
            }
        );
    }

    #[test]
    fn empty_query_is_unconstrained() {
        assert_eq!(tokenize(""), SearchFilter::default());
        assert_eq!(tokenize("   \t "), SearchFilter::default());
    }

    #[test]
    fn plain_words_do_not_constrain() {
        assert_eq!(tokenize("hello"), SearchFilter::default());
        assert_eq!(tokens("hello"), vec![Token::Term("hello".into())]);
    }

    #[test]
    fn underscores_become_spaces() {
        let filter = tokenize("tag:game_dev serie:my_first_serie");
        assert_eq!(filter.tags, vec!["game dev"]);
        assert_eq!(filter.series, vec!["my first serie"]);
    }

    #[test]
    fn repeated_operators_accumulate() {
        let filter = tokenize("tag:go tag:rust,wasm");
        assert_eq!(filter.tags, vec!["go", "rust", "wasm"]);
    }

    #[test]
    fn last_title_wins() {
        let filter = tokenize("title:first title:second");
        assert_eq!(filter.title.as_deref(), Some("second"));
    }

    #[test]
    fn input_is_lowercased() {
        let filter = tokenize("TAG:Rust SERIE:DevLog");
        assert_eq!(filter.tags, vec!["rust"]);
        assert_eq!(filter.series, vec!["devlog"]);
    }

    #[test]
    fn empty_values_are_dropped() {
        assert_eq!(tokenize("tag:,a,,").tags, vec!["a"]);
        assert!(tokenize("tag:,,").tags.is_empty());
    }

    #[test]
    fn malformed_fragments_degrade_to_no_constraint() {
        assert!(tokenize("tag: serie: ::: ,,, !!!").is_empty());
        assert!(tokenize("xtag:go").tags.is_empty());
    }

    #[test]
    fn operators_mixed_with_terms() {
        let toks = tokens("intro tag:go notes");
        assert_eq!(
            toks,
            vec![
                Token::Term("intro".into()),
                Token::Tag(vec!["go".into()]),
                Token::Term("notes".into()),
            ]
        );
    }
}
