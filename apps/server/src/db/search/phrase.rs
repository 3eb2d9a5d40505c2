//! Free-text phrase handling.
//!
//! A phrase becomes a `to_tsquery('simple', …)` expression with AND semantics
//! between tokens and a prefix match on the final token:
//! `"  apple   inc "` → `apple & inc:*`.
//!
//! Phrases and documents are split on the same non-alphanumeric boundaries,
//! so `berkshire-hathaway` searches as `berkshire & hathaway:*`. This also
//! drops every `tsquery` operator character, so user input can never produce
//! a query syntax error.

/// Collapse whitespace runs into single spaces and trim the ends.
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A normalized phrase: lowercase tokens in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseQuery {
    tokens: Vec<String>,
}

impl PhraseQuery {
    /// Returns `None` when nothing searchable remains after normalization.
    pub fn parse(raw: &str) -> Option<Self> {
        let tokens = tokenize_document(raw);

        if tokens.is_empty() {
            None
        } else {
            Some(Self { tokens })
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// `tsquery` text: tokens joined with `&`, final token prefix-matched.
    pub fn to_tsquery(&self) -> String {
        let last = self.tokens.len() - 1;
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if i == last {
                    format!("{t}:*")
                } else {
                    t.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" & ")
    }

    /// Evaluate against a tokenized document the way the `simple` text-search
    /// configuration does: exact lexemes, prefix on the final token.
    pub fn matches_document<S: AsRef<str>>(&self, document: &[S]) -> bool {
        let last = self.tokens.len() - 1;
        self.tokens.iter().enumerate().all(|(i, token)| {
            document.iter().any(|lexeme| {
                let lexeme = lexeme.as_ref();
                if i == last {
                    lexeme.starts_with(token.as_str())
                } else {
                    lexeme == token
                }
            })
        })
    }
}

/// Split document text into lowercase lexemes on non-alphanumeric boundaries.
pub fn tokenize_document(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}
