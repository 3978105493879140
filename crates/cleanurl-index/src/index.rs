//! Longest-first index of item set identifiers.
//!
//! Item set identifiers may be prefixes of one another ("book" and
//! "book_series"), so they are sorted by descending length and matched as a
//! single alternation: the first alternative that matches at a segment
//! boundary is the most specific one.

use std::cmp::Reverse;

use cleanurl_core::encode_segment;
use regex::{Regex, RegexBuilder};

use crate::Result;

/// Large collections produce long alternations.
const REGEX_SIZE_LIMIT: usize = 64 * 1024 * 1024;

/// Immutable snapshot of every item set identifier, ready for path matching.
///
/// Identifiers are kept encoded the way the path builder writes them, so a
/// `/` inside an identifier never reads as a segment separator.
#[derive(Debug, Clone, Default)]
pub struct ItemSetIdentifierIndex {
    identifiers: Vec<String>,
    alternation: String,
    prefix: Option<Regex>,
}

impl ItemSetIdentifierIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rebuild<I, S>(identifiers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut encoded: Vec<String> = identifiers
            .into_iter()
            .filter(|identifier| !identifier.as_ref().is_empty())
            .map(|identifier| encode_segment(identifier.as_ref()))
            .collect();
        encoded.sort_by(|a, b| (Reverse(a.len()), a).cmp(&(Reverse(b.len()), b)));
        encoded.dedup();

        if encoded.is_empty() {
            return Ok(Self::empty());
        }

        let alternation = encoded
            .iter()
            .map(|identifier| regex::escape(identifier))
            .collect::<Vec<_>>()
            .join("|");
        let prefix = RegexBuilder::new(&format!("^({alternation})(?:/|$)"))
            .size_limit(REGEX_SIZE_LIMIT)
            .build()?;

        Ok(Self {
            identifiers: encoded,
            alternation,
            prefix: Some(prefix),
        })
    }

    /// Encoded identifiers, longest first.
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    /// The escaped alternation, longest identifier first.
    pub fn alternation(&self) -> &str {
        &self.alternation
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Split `path` into a leading item set identifier (still encoded) and the
    /// rest of the path after the following `/`. Request paths are expected
    /// in their normalized spelling (see [`cleanurl_core::normalize_path`]).
    pub fn match_prefix<'p>(&self, path: &'p str) -> Option<(&'p str, &'p str)> {
        let captures = self.prefix.as_ref()?.captures(path)?;
        let identifier = captures.get(1)?.as_str();
        let end = captures.get(0)?.end();
        Some((identifier, &path[end..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_longest_first() {
        let index = ItemSetIdentifierIndex::rebuild(["book", "book_series", "a", "zine"]).unwrap();
        assert_eq!(index.identifiers(), &["book_series", "book", "zine", "a"]);
        assert_eq!(index.alternation(), "book_series|book|zine|a");
    }

    #[test]
    fn test_longest_match_wins() {
        let index = ItemSetIdentifierIndex::rebuild(["book", "book_series"]).unwrap();

        assert_eq!(index.match_prefix("book_series/42"), Some(("book_series", "42")));
        assert_eq!(index.match_prefix("book/42"), Some(("book", "42")));
        assert_eq!(index.match_prefix("book_series"), Some(("book_series", "")));
        assert_eq!(index.match_prefix("book_seriesx/42"), None);
        assert_eq!(index.match_prefix("books"), None);
    }

    #[test]
    fn test_identifiers_are_escaped_and_encoded() {
        let index = ItemSetIdentifierIndex::rebuild(["a.b", "x/y", "été", "ark:1"]).unwrap();

        assert_eq!(index.match_prefix("a.b/1"), Some(("a.b", "1")));
        assert_eq!(index.match_prefix("aXb/1"), None);
        assert_eq!(index.match_prefix("x%2Fy/1"), Some(("x%2Fy", "1")));
        assert_eq!(index.match_prefix("x/y/1"), None);
        assert_eq!(index.match_prefix("été"), Some(("été", "")));
        assert_eq!(index.match_prefix("ark:1/poem-1"), Some(("ark:1", "poem-1")));
    }

    #[test]
    fn test_identifiers_kept_as_built() {
        // Surrounding spaces are part of the identifier, as in built paths.
        let index = ItemSetIdentifierIndex::rebuild([" poems", "", "poems", "poems"]).unwrap();
        assert_eq!(index.identifiers(), &["%20poems", "poems"]);
        assert_eq!(index.match_prefix("%20poems/1"), Some(("%20poems", "1")));
        assert_eq!(index.match_prefix("poems/1"), Some(("poems", "1")));
    }

    #[test]
    fn test_empty_index_never_matches() {
        let index = ItemSetIdentifierIndex::rebuild(Vec::<String>::new()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.alternation(), "");
        assert_eq!(index.match_prefix("anything"), None);
        assert_eq!(index.match_prefix(""), None);
    }
}
