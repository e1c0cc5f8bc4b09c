//! Lookup Sources
//!
//! Source traits (strategy pattern) and their live HTTP implementations.
//! Tools depend only on the traits; tests swap in `MockLookup`.

mod arxiv;
mod duckduckgo;
mod mock;
mod wikipedia;

pub use arxiv::ArxivApi;
pub use duckduckgo::DuckDuckGoApi;
pub use mock::MockLookup;
pub use wikipedia::WikipediaApi;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{PageSummary, Paper, SearchHit};

/// Encyclopedia summary source (Wikipedia or compatible)
#[async_trait]
pub trait EncyclopediaSource: Send + Sync {
    /// Find up to `top_k` matching pages and return their summaries
    async fn summarize(&self, query: &str, top_k: usize) -> Result<Vec<PageSummary>>;

    /// Source name (for logging)
    fn name(&self) -> &str;
}

/// Academic paper search source (arXiv or compatible)
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Search for papers matching the query
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Paper>>;

    /// Source name (for logging)
    fn name(&self) -> &str;
}

/// General web search source
#[async_trait]
pub trait WebSource: Send + Sync {
    /// Search the web
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;

    /// Source name (for logging)
    fn name(&self) -> &str;
}
