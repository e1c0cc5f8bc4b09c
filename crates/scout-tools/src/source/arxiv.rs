//! arXiv Source
//!
//! Queries the arXiv export API and parses the returned Atom feed.

use async_trait::async_trait;
use serde::Deserialize;

use super::PaperSource;
use crate::error::{LookupError, Result};
use crate::model::{collapse_whitespace, Paper};

const DEFAULT_API_URL: &str = "https://export.arxiv.org/api/query";

/// Live arXiv client over the export API
pub struct ArxivApi {
    client: reqwest::Client,
    api_url: String,
}

impl Default for ArxivApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ArxivApi {
    pub fn new() -> Self {
        Self::with_api_url(DEFAULT_API_URL)
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    /// Parse an Atom feed body into papers
    fn parse_feed(body: &str) -> Result<Vec<Paper>> {
        let feed: AtomFeed = quick_xml::de::from_str(body)?;

        Ok(feed
            .entries
            .into_iter()
            .map(|entry| Paper {
                // The Atom id is a URL like http://arxiv.org/abs/2301.00001v1
                id: entry
                    .id
                    .rsplit('/')
                    .next()
                    .unwrap_or(entry.id.as_str())
                    .to_string(),
                title: collapse_whitespace(&entry.title),
                summary: collapse_whitespace(&entry.summary),
                authors: entry.authors.into_iter().map(|a| a.name).collect(),
                published: entry.published,
            })
            .collect())
    }
}

#[async_trait]
impl PaperSource for ArxivApi {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>> {
        if query.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let search_query = format!("all:{}", query);
        let body = self
            .client
            .get(&self.api_url)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", &limit.max(1).to_string()),
            ])
            .send()
            .await?
            .text()
            .await?;

        let papers = Self::parse_feed(&body)?;
        if papers.is_empty() {
            return Err(LookupError::NoResults(query.into()));
        }

        Ok(papers)
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}

// ============================================================================
// Atom feed types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: String,
    title: String,
    summary: String,
    #[serde(default)]
    published: String,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:attention</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <updated>2023-08-02T00:41:18Z</updated>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All You Need</title>
    <summary>The dominant sequence transduction models are based on complex
  recurrent or convolutional neural networks.</summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_feed() {
        let papers = ArxivApi::parse_feed(SAMPLE_FEED).unwrap();
        assert_eq!(papers.len(), 1);

        let paper = &papers[0];
        assert_eq!(paper.id, "1706.03762v7");
        assert_eq!(paper.title, "Attention Is All You Need");
        assert_eq!(paper.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(paper.published, "2017-06-12T17:57:34Z");
        // Hard-wrapped abstract is collapsed to one line
        assert!(!paper.summary.contains('\n'));
    }

    #[test]
    fn test_parse_empty_feed() {
        let body = r#"<?xml version="1.0"?><feed xmlns="http://www.w3.org/2005/Atom"><title>empty</title></feed>"#;
        let papers = ArxivApi::parse_feed(body).unwrap();
        assert!(papers.is_empty());
    }
}
