//! # scout-tools
//!
//! Lookup tools that ground the scout agent's answers in external sources:
//!
//! - **wikipedia** - encyclopedia summaries (top result, capped extract)
//! - **arxiv** - academic paper search over the arXiv export API
//! - **web_search** - general web search via DuckDuckGo instant answers
//!
//! Each tool wraps a source trait (strategy pattern) so the live HTTP
//! clients can be swapped for mocks in tests.

pub mod toolkit;
pub mod source;
pub mod model;
pub mod error;

pub use error::{LookupError, Result};
pub use model::{PageSummary, Paper, SearchHit};
pub use source::{
    ArxivApi, DuckDuckGoApi, EncyclopediaSource, MockLookup, PaperSource, WebSource,
    WikipediaApi,
};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::toolkit::{PaperSearchTool, WebSearchTool, WikiSummaryTool};
}

/// System prompt for the search agent
pub const SEARCH_AGENT_PROMPT: &str = r#"You are a helpful research assistant that answers questions using lookup tools.

## How to Answer

1. If the question needs factual grounding, call a tool first:
   - `wikipedia` for encyclopedic topics, people, places, and concepts
   - `arxiv` for academic papers and research results
   - `web_search` for current events and anything else
2. Synthesize tool output into a short, direct answer in your own words.
3. If you already know the answer with confidence, answer directly.
4. Never invent citations; only reference what a tool returned.

When you need a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"query": "..."}}
```

After receiving tool results, write the final answer as plain text."#;
