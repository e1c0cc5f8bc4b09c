//! Mock Lookup Source
//!
//! For testing and offline demos. Returns canned results for a few topics
//! and `NoResults` for everything else.

use async_trait::async_trait;

use super::{EncyclopediaSource, PaperSource, WebSource};
use crate::error::{LookupError, Result};
use crate::model::{PageSummary, Paper, SearchHit};

/// Mock source implementing all three lookup traits
#[derive(Default)]
pub struct MockLookup;

impl MockLookup {
    pub fn new() -> Self {
        Self
    }

    fn matches(query: &str, topic: &str) -> bool {
        query.to_lowercase().contains(topic)
    }
}

#[async_trait]
impl EncyclopediaSource for MockLookup {
    async fn summarize(&self, query: &str, _top_k: usize) -> Result<Vec<PageSummary>> {
        if query.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let summary = if Self::matches(query, "generative") {
            PageSummary {
                title: "Generative artificial intelligence".into(),
                extract: "Generative artificial intelligence is artificial intelligence \
                          capable of generating text, images, or other data using \
                          generative models, often in response to prompts."
                    .into(),
                url: "https://en.wikipedia.org/wiki/Generative_artificial_intelligence".into(),
            }
        } else if Self::matches(query, "rust") {
            PageSummary {
                title: "Rust (programming language)".into(),
                extract: "Rust is a general-purpose programming language emphasizing \
                          performance, type safety, and concurrency."
                    .into(),
                url: "https://en.wikipedia.org/wiki/Rust_(programming_language)".into(),
            }
        } else {
            return Err(LookupError::NoResults(query.into()));
        };

        Ok(vec![summary])
    }

    fn name(&self) -> &str {
        "mock-encyclopedia"
    }
}

#[async_trait]
impl PaperSource for MockLookup {
    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<Paper>> {
        if query.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        if Self::matches(query, "attention") || Self::matches(query, "transformer") {
            Ok(vec![Paper {
                id: "1706.03762v7".into(),
                title: "Attention Is All You Need".into(),
                summary: "We propose a new simple network architecture, the Transformer, \
                          based solely on attention mechanisms."
                    .into(),
                authors: vec!["Ashish Vaswani".into(), "Noam Shazeer".into()],
                published: "2017-06-12T17:57:34Z".into(),
            }])
        } else {
            Err(LookupError::NoResults(query.into()))
        }
    }

    fn name(&self) -> &str {
        "mock-papers"
    }
}

#[async_trait]
impl WebSource for MockLookup {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        if Self::matches(query, "weather") {
            return Err(LookupError::NoResults(query.into()));
        }

        let hits = vec![
            SearchHit {
                title: format!("Top result for {query}"),
                snippet: format!("A relevant page about {query}."),
                url: "https://example.com/1".into(),
            },
            SearchHit {
                title: format!("Second result for {query}"),
                snippet: format!("Another page discussing {query}."),
                url: "https://example.com/2".into(),
            },
        ];

        Ok(hits.into_iter().take(limit.max(1)).collect())
    }

    fn name(&self) -> &str {
        "mock-web"
    }
}
