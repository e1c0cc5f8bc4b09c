//! Wikipedia Summary Tool

use std::sync::Arc;

use async_trait::async_trait;

use scout_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use super::{DEFAULT_MAX_CHARS, DEFAULT_TOP_K};
use crate::model::cap_chars;
use crate::source::EncyclopediaSource;

/// Tool returning capped encyclopedia summaries
pub struct WikiSummaryTool {
    source: Arc<dyn EncyclopediaSource>,
    top_k: usize,
    max_chars: usize,
}

impl WikiSummaryTool {
    pub fn new(source: Arc<dyn EncyclopediaSource>) -> Self {
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
impl Tool for WikiSummaryTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "wikipedia".into(),
            description: "Look up an encyclopedia summary for a topic, person, place, or concept. Returns the top matching page with a short plain-text extract.".into(),
            parameters: vec![ParameterSchema::required_string(
                "query",
                "Topic to look up (e.g., 'Generative AI')",
            )],
            category: Some("lookup".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call.str_arg("query").unwrap_or_default();
        if query.is_empty() {
            return Ok(ToolResult::failure("wikipedia", "Empty query"));
        }

        match self.source.summarize(query, self.top_k).await {
            Ok(pages) => {
                let mut output = String::new();
                for page in pages {
                    output.push_str(&format!(
                        "Page: {}\nSummary: {}\nSource: {}\n",
                        page.title,
                        cap_chars(&page.extract, self.max_chars),
                        page.url
                    ));
                }
                Ok(ToolResult::success("wikipedia", output.trim()))
            }
            Err(e) => {
                tracing::debug!(source = self.source.name(), error = %e, "lookup failed");
                Ok(ToolResult::failure("wikipedia", e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockLookup;
    use std::collections::HashMap;

    fn call(query: &str) -> ToolCall {
        let mut arguments = HashMap::new();
        arguments.insert("query".into(), serde_json::json!(query));
        ToolCall {
            name: "wikipedia".into(),
            arguments,
            id: None,
        }
    }

    #[tokio::test]
    async fn test_summary_is_capped() {
        let tool =
            WikiSummaryTool::new(Arc::new(MockLookup::new())).with_caps(1, 40);
        let result = tool.execute(&call("What is Generative AI?")).await.unwrap();

        assert!(result.success);
        assert!(result.output.contains("Generative artificial intelligence"));

        let summary_line = result
            .output
            .lines()
            .find(|l| l.starts_with("Summary: "))
            .unwrap();
        // 40 chars + ellipsis
        assert!(summary_line.trim_start_matches("Summary: ").chars().count() <= 41);
    }

    #[tokio::test]
    async fn test_unknown_topic_reports_failure() {
        let tool = WikiSummaryTool::new(Arc::new(MockLookup::new()));
        let result = tool.execute(&call("xyzzy plugh")).await.unwrap();

        assert!(!result.success);
        assert!(result.output.contains("No results"));
    }

    #[tokio::test]
    async fn test_empty_query_is_a_tool_failure() {
        let tool = WikiSummaryTool::new(Arc::new(MockLookup::new()));
        let result = tool.execute(&call("  ")).await.unwrap();

        assert!(!result.success);
    }
}
