//! Query parsing module
//!
//! Reduces the user's free-text input to uppercase tokens. A record matches
//! when its name contains every token, in any order; tokens are whole name
//! words, so "CAT" does not match "CATEGORY".

use serde::{Deserialize, Serialize};

/// Split `text` on runs of spaces and hyphens, uppercasing the tokens and
/// discarding empty ones.
///
/// This is the canonical tokenizer for both record names and queries, so
/// "HYPHEN-MINUS" can be found with "hyphen minus" and vice versa.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_uppercase()
        .split(|c: char| c == ' ' || c == '-')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// A parsed search query: the uppercase terms a record name must contain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    /// Parse a raw query string
    pub fn parse(raw: &str) -> Self {
        Self {
            terms: tokenize(raw),
        }
    }

    /// Build a query from separate words, e.g. command-line arguments
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = words
            .into_iter()
            .map(|word| word.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Self::parse(&joined)
    }

    /// The parsed terms, in input order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Check if the query has no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when every term occurs in `words`.
    ///
    /// Containment is exact token equality, not substring search. A query
    /// with no terms matches everything.
    pub fn matches(&self, words: &[String]) -> bool {
        self.terms
            .iter()
            .all(|term| words.iter().any(|word| word == term))
    }
}
