//! DuckDuckGo Source
//!
//! General web search via the DuckDuckGo Instant Answer API. The API
//! returns an abstract plus related topics; both are flattened into hits.

use async_trait::async_trait;
use serde::Deserialize;

use super::WebSource;
use crate::error::{LookupError, Result};
use crate::model::SearchHit;

const DEFAULT_API_URL: &str = "https://api.duckduckgo.com/";

/// Live DuckDuckGo client over the Instant Answer API
pub struct DuckDuckGoApi {
    client: reqwest::Client,
    api_url: String,
}

impl Default for DuckDuckGoApi {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoApi {
    pub fn new() -> Self {
        Self::with_api_url(DEFAULT_API_URL)
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    /// Flatten an instant-answer response into at most `limit` hits
    fn collect_hits(response: InstantAnswer, limit: usize) -> Vec<SearchHit> {
        let mut hits = Vec::new();

        if !response.abstract_text.is_empty() {
            hits.push(SearchHit {
                title: response.heading,
                snippet: response.abstract_text,
                url: response.abstract_url,
            });
        }

        let mut pending: std::collections::VecDeque<RelatedTopic> =
            response.related_topics.into();
        while hits.len() < limit {
            let Some(topic) = pending.pop_front() else { break };
            match topic {
                RelatedTopic::Leaf { text, first_url } => {
                    if !text.is_empty() {
                        hits.push(SearchHit {
                            // The topic text doubles as the title; DDG has
                            // no separate field for leaf topics
                            title: text.chars().take(60).collect(),
                            snippet: text,
                            url: first_url,
                        });
                    }
                }
                RelatedTopic::Group { topics } => {
                    // Grouped topics (disambiguation) keep their order
                    for t in topics.into_iter().rev() {
                        pending.push_front(t);
                    }
                }
            }
        }

        hits.truncate(limit);
        hits
    }
}

#[async_trait]
impl WebSource for DuckDuckGoApi {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let response: InstantAnswer = self
            .client
            .get(&self.api_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "0"),
            ])
            .send()
            .await?
            .json()
            .await?;

        let hits = Self::collect_hits(response, limit.max(1));
        if hits.is_empty() {
            return Err(LookupError::NoResults(query.into()));
        }

        Ok(hits)
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

// ============================================================================
// Instant Answer wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,

    #[serde(rename = "AbstractText", default)]
    abstract_text: String,

    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,

    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    // `Text` and `Topics` are deliberately non-defaulted: untagged
    // deserialization needs one of them present to pick the variant
    Leaf {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Heading": "Rust (programming language)",
        "AbstractText": "Rust is a general-purpose programming language.",
        "AbstractURL": "https://en.wikipedia.org/wiki/Rust_(programming_language)",
        "RelatedTopics": [
            {"Text": "Cargo - The Rust package manager.", "FirstURL": "https://duckduckgo.com/Cargo"},
            {"Topics": [{"Text": "Rust Belt - A region.", "FirstURL": "https://duckduckgo.com/Rust_Belt"}]}
        ]
    }"#;

    #[test]
    fn test_abstract_becomes_first_hit() {
        let response: InstantAnswer = serde_json::from_str(SAMPLE).unwrap();
        let hits = DuckDuckGoApi::collect_hits(response, 5);

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title, "Rust (programming language)");
        assert!(hits[1].snippet.starts_with("Cargo"));
        assert!(hits[2].snippet.starts_with("Rust Belt"));
    }

    #[test]
    fn test_limit_is_applied() {
        let response: InstantAnswer = serde_json::from_str(SAMPLE).unwrap();
        let hits = DuckDuckGoApi::collect_hits(response, 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_empty_answer_yields_no_hits() {
        let response: InstantAnswer = serde_json::from_str(r#"{}"#).unwrap();
        assert!(DuckDuckGoApi::collect_hits(response, 5).is_empty());
    }
}
