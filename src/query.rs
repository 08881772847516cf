//! Free-text query handling.
//!
//! A query is split on whitespace into tokens. Each token becomes a
//! case-insensitive *literal* pattern: user text is escaped before it reaches
//! the regex compiler, so `"c++"` or `"(.*)*"` match themselves instead of
//! being interpreted.

use regex::{Regex, RegexBuilder};

use crate::error::{ForkfulError, Result};

/// Whitespace-separated tokens of a query, in order, empty tokens dropped.
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_string).collect()
}

/// Whether the query has anything to search for.
pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// Case-insensitive literal matcher for one token.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    token: String,
    regex: Regex,
}

impl TokenMatcher {
    pub fn new(token: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&regex::escape(token))
            .case_insensitive(true)
            .build()
            .map_err(|e| ForkfulError::invalid_argument(format!("Bad token '{token}': {e}")))?;
        Ok(Self {
            token: token.to_string(),
            regex,
        })
    }

    /// True if the token occurs anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// True if the token occurs in any of `values`.
    pub fn matches_any<S: AsRef<str>>(&self, values: &[S]) -> bool {
        values.iter().any(|v| self.matches(v.as_ref()))
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// A set of token matchers evaluated together.
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    matchers: Vec<TokenMatcher>,
}

impl TokenSet {
    pub fn new<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let matchers = tokens
            .iter()
            .map(|t| TokenMatcher::new(t.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { matchers })
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Every token matches at least one of `values`. An empty set matches nothing.
    pub fn all_match_any<S: AsRef<str>>(&self, values: &[S]) -> bool {
        !self.matchers.is_empty() && self.matchers.iter().all(|m| m.matches_any(values))
    }

    /// At least one token occurs in `text`.
    pub fn any_matches(&self, text: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  spicy   veg biryani "), vec!["spicy", "veg", "biryani"]);
        assert!(tokenize("   ").is_empty());
        assert!(is_blank(" \t"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn test_token_matcher_is_case_insensitive() {
        let m = TokenMatcher::new("CHINESE").unwrap();
        assert!(m.matches("Indo-Chinese"));
        assert!(!m.matches("Thai"));
        assert_eq!(m.token(), "CHINESE");
    }

    #[test]
    fn test_token_matcher_escapes_metacharacters() {
        let m = TokenMatcher::new("c++").unwrap();
        assert!(m.matches("C++ Grill"));
        assert!(!m.matches("cc"));

        let m = TokenMatcher::new("(.*)*").unwrap();
        assert!(!m.matches("anything"));
        assert!(m.matches("literally (.*)*"));
    }

    #[test]
    fn test_token_set_all_and_any() {
        let set = TokenSet::new(&["veg", "spicy"]).unwrap();
        assert!(set.all_match_any(&["Spicy", "Vegetarian"]));
        assert!(!set.all_match_any(&["Vegetarian"]));
        assert!(set.any_matches("Veg Thali"));

        let empty = TokenSet::default();
        assert!(empty.is_empty());
        assert!(!empty.all_match_any(&["anything"]));
    }
}
