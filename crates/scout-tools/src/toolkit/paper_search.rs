//! Paper Search Tool

use std::sync::Arc;

use async_trait::async_trait;

use scout_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use super::{DEFAULT_MAX_CHARS, DEFAULT_TOP_K};
use crate::model::cap_chars;
use crate::source::PaperSource;

/// Tool returning academic paper abstracts
pub struct PaperSearchTool {
    source: Arc<dyn PaperSource>,
    top_k: usize,
    max_chars: usize,
}

impl PaperSearchTool {
    pub fn new(source: Arc<dyn PaperSource>) -> Self {
        Self {
            source,
            top_k: DEFAULT_TOP_K,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Override the result-size caps
    pub fn with_caps(mut self, top_k: usize, max_chars: usize) -> Self {
        self.top_k = top_k;
        self.max_chars = max_chars;
        self
    }
}

#[async_trait]
impl Tool for PaperSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "arxiv".into(),
            description: "Search the arXiv paper archive. Returns the top matching paper with title, authors, publication date, and a capped abstract.".into(),
            parameters: vec![ParameterSchema::required_string(
                "query",
                "Search terms (e.g., 'attention transformers')",
            )],
            category: Some("lookup".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call.str_arg("query").unwrap_or_default();
        if query.is_empty() {
            return Ok(ToolResult::failure("arxiv", "Empty query"));
        }

        match self.source.search(query, self.top_k).await {
            Ok(papers) => {
                let mut output = String::new();
                for paper in papers {
                    output.push_str(&format!(
                        "Title: {}\nAuthors: {}\nPublished: {}\nAbstract: {}\n",
                        paper.title,
                        paper.authors.join(", "),
                        paper.published,
                        cap_chars(&paper.summary, self.max_chars)
                    ));
                }
                Ok(ToolResult::success("arxiv", output.trim()))
            }
            Err(e) => {
                tracing::debug!(source = self.source.name(), error = %e, "lookup failed");
                Ok(ToolResult::failure("arxiv", e.to_string()))
            }
        }
    }
}
