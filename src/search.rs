//! Multi-term boolean search over a file's name and content.
//!
//! A search is an ordered list of [`SearchTerm`]s. An AND term holds one word. An OR term holds several
//! candidates and matches if any of them does. Matching is plain substring containment.
//!
//! Evaluation runs in two phases that share one counter:
//!
//! 1. Every term is checked against the file name (case-sensitive). If all terms hit, the search succeeds
//!    without touching the disk.
//! 2. Otherwise the content is read, lower-cased, and every term is checked again. Hits are **added** to the
//!    title-phase count.
//!
//! The search succeeds iff the final count equals the number of terms. A term can therefore count twice,
//! once per phase, and a file that over-matches fails:
//!
//! ```rust
//! use quire_core::search::{SearchTerm, evaluate};
//!
//! let terms = [SearchTerm::and("foo"), SearchTerm::and("bar")];
//! // one hit in the name, two in the content
//! let found = evaluate("foo.md", &terms, || Ok("foo bar".to_string()))?;
//! assert!(!found);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io;

/// One term of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// The haystack must contain this word.
    And(String),
    /// The haystack must contain at least one of these words.
    Or(Vec<String>),
}

impl SearchTerm {
    pub fn and(word: impl Into<String>) -> Self {
        SearchTerm::And(word.into())
    }

    pub fn or<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchTerm::Or(words.into_iter().map(Into::into).collect())
    }

    /// Builds a term from an operator name and its words.
    ///
    /// `"AND"` yields an AND term over the words joined by single spaces. Any other operator is treated as OR.
    pub fn from_parts(operator: &str, words: Vec<String>) -> Self {
        if operator == "AND" {
            SearchTerm::And(words.join(" "))
        } else {
            SearchTerm::Or(words)
        }
    }

    /// Whether this term hits `haystack`. OR terms stop at the first hit.
    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            SearchTerm::And(word) => haystack.contains(word.as_str()),
            SearchTerm::Or(words) => words.iter().any(|word| haystack.contains(word.as_str())),
        }
    }

    fn push_alternative(&mut self, word: String) {
        match self {
            SearchTerm::And(first) => {
                let first = std::mem::take(first);
                *self = SearchTerm::Or(vec![first, word]);
            }
            SearchTerm::Or(words) => words.push(word),
        }
    }
}

fn count_matches(terms: &[SearchTerm], haystack: &str) -> usize {
    terms.iter().filter(|term| term.matches(haystack)).count()
}

/// Runs the two-phase search against `name`, calling `content` only when the name alone is not enough.
pub fn evaluate<F>(name: &str, terms: &[SearchTerm], content: F) -> io::Result<bool>
where
    F: FnOnce() -> io::Result<String>,
{
    let mut matches = count_matches(terms, name);
    if matches == terms.len() {
        return Ok(true);
    }

    let content = content()?.to_lowercase();
    matches += count_matches(terms, &content);

    Ok(matches == terms.len())
}

enum Token {
    Word(String),
    Pipe,
}

fn tokenize(query: &str) -> Vec<Token> {
    fn flush(current: &mut String, tokens: &mut Vec<Token>) {
        if !current.is_empty() {
            tokens.push(Token::Word(std::mem::take(current)));
        }
    }

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in query.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                if !quoted {
                    flush(&mut current, &mut tokens);
                }
            }
            '|' if !quoted => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Pipe);
            }
            c if c.is_whitespace() && !quoted => flush(&mut current, &mut tokens),
            c => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}

/// Parses a user query into search terms.
///
/// - Whitespace separates AND terms.
/// - `"double quotes"` keep a phrase together as one word.
/// - `a|b` (or `a | b`) merges its neighbours into one OR term.
///
/// Words are lower-cased, since the content phase compares against lower-cased content.
pub fn parse_query(query: &str) -> Vec<SearchTerm> {
    let mut terms: Vec<SearchTerm> = Vec::new();
    let mut pending_or = false;

    for token in tokenize(query) {
        match token {
            Token::Pipe => pending_or = !terms.is_empty(),
            Token::Word(word) => {
                let word = word.to_lowercase();
                match terms.last_mut() {
                    Some(last) if pending_or => last.push_alternative(word),
                    _ => terms.push(SearchTerm::And(word)),
                }
                pending_or = false;
            }
        }
    }

    terms
}
