//! Wikipedia Source
//!
//! Two-step MediaWiki flow: full-text search to find page IDs, then a
//! plain-text intro extract for each hit.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

use super::EncyclopediaSource;
use crate::error::{LookupError, Result};
use crate::model::PageSummary;

const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Live Wikipedia client over the MediaWiki action API
pub struct WikipediaApi {
    client: reqwest::Client,
    api_url: String,
}

impl Default for WikipediaApi {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaApi {
    pub fn new() -> Self {
        Self::with_api_url(DEFAULT_API_URL)
    }

    /// Point at a different MediaWiki install (other language editions,
    /// test servers)
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    async fn search_page_ids(&self, query: &str, top_k: usize) -> Result<Vec<u64>> {
        let response: SearchResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", &top_k.to_string()),
                ("format", "json"),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(response
            .query
            .map(|q| q.search.into_iter().map(|s| s.pageid).collect())
            .unwrap_or_default())
    }

    async fn fetch_extracts(&self, page_ids: &[u64]) -> Result<Vec<PageSummary>> {
        let ids = page_ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join("|");

        let response: ExtractResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts|info"),
                ("explaintext", "1"),
                ("exintro", "1"),
                ("inprop", "url"),
                ("pageids", &ids),
                ("format", "json"),
            ])
            .send()
            .await?
            .json()
            .await?;

        let pages = response.query.map(|q| q.pages).unwrap_or_default();

        // Preserve search ranking; the pages map is unordered
        let mut summaries = Vec::new();
        for id in page_ids {
            if let Some(page) = pages.get(&id.to_string()) {
                summaries.push(PageSummary {
                    title: page.title.clone(),
                    extract: page.extract.clone().unwrap_or_default(),
                    url: page.fullurl.clone().unwrap_or_else(|| {
                        format!(
                            "https://en.wikipedia.org/wiki/{}",
                            page.title.replace(' ', "_")
                        )
                    }),
                });
            }
        }

        Ok(summaries)
    }
}

#[async_trait]
impl EncyclopediaSource for WikipediaApi {
    async fn summarize(&self, query: &str, top_k: usize) -> Result<Vec<PageSummary>> {
        if query.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let page_ids = self.search_page_ids(query, top_k.max(1)).await?;
        if page_ids.is_empty() {
            return Err(LookupError::NoResults(query.into()));
        }

        self.fetch_extracts(&page_ids).await
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}

// ============================================================================
// MediaWiki wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    pageid: u64,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    fullurl: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_decoding() {
        let body = r#"{"query":{"search":[{"ns":0,"title":"Generative artificial intelligence","pageid":72416804}]}}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.query.unwrap().search[0].pageid, 72_416_804);
    }

    #[test]
    fn test_extract_response_decoding() {
        let body = r#"{"query":{"pages":{"72416804":{"pageid":72416804,"title":"Generative artificial intelligence","extract":"Generative AI is...","fullurl":"https://en.wikipedia.org/wiki/Generative_artificial_intelligence"}}}}"#;
        let response: ExtractResponse = serde_json::from_str(body).unwrap();
        let pages = response.query.unwrap().pages;
        assert_eq!(
            pages["72416804"].extract.as_deref(),
            Some("Generative AI is...")
        );
    }

    #[test]
    fn test_empty_search_yields_no_ids() {
        let body = r#"{"batchcomplete":""}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(response.query.is_none());
    }
}
