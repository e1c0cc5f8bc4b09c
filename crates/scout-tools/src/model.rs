//! Lookup Result Models

use serde::{Deserialize, Serialize};

/// An encyclopedia page summary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PageSummary {
    /// Page title
    pub title: String,

    /// Plain-text extract (lead section)
    pub extract: String,

    /// Canonical page URL
    pub url: String,
}

/// An academic paper
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paper {
    /// Archive identifier (e.g., "2301.00001")
    pub id: String,

    /// Paper title
    pub title: String,

    /// Abstract text
    pub summary: String,

    /// Author names
    pub authors: Vec<String>,

    /// Publication date (as reported by the archive)
    pub published: String,
}

/// A single web search hit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchHit {
    /// Result title or heading
    pub title: String,

    /// Snippet text
    pub snippet: String,

    /// Result URL
    pub url: String,
}

/// Truncate to at most `max_chars` characters, appending an ellipsis when
/// anything was cut
pub fn cap_chars(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push('…');
    }
    out
}

/// Collapse whitespace runs (Atom feeds hard-wrap abstracts)
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_chars_short_input_unchanged() {
        assert_eq!(cap_chars("hello", 300), "hello");
    }

    #[test]
    fn test_cap_chars_truncates_on_char_boundary() {
        let capped = cap_chars("héllo wörld", 5);
        assert_eq!(capped, "héllo…");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  a\n  hard-wrapped\tabstract "),
            "a hard-wrapped abstract"
        );
    }
}
