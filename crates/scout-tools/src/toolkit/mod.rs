//! Toolkit - Agent Tools
//!
//! Lookup tools that implement `scout_core::Tool` over the source traits.
//! Each tool carries fixed result caps set at construction.

mod paper_search;
mod web_search;
mod wiki_summary;

pub use paper_search::PaperSearchTool;
pub use web_search::WebSearchTool;
pub use wiki_summary::WikiSummaryTool;

/// Default number of results per lookup
pub const DEFAULT_TOP_K: usize = 1;

/// Default cap on returned text, in characters
pub const DEFAULT_MAX_CHARS: usize = 300;
