//! Web Search Tool

use std::sync::Arc;

use async_trait::async_trait;

use scout_core::{
    tool::ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use super::DEFAULT_MAX_CHARS;
use crate::model::cap_chars;
use crate::source::WebSource;

/// Number of hits the web tool returns by default (snippets are short, so
/// more than one is useful context)
const DEFAULT_HITS: usize = 3;

/// General-purpose internet search tool
pub struct WebSearchTool {
    source: Arc<dyn WebSource>,
    max_hits: usize,
    max_chars: usize,
}

impl WebSearchTool {
    pub fn new(source: Arc<dyn WebSource>) -> Self {
        Self {
            source,
            max_hits: DEFAULT_HITS,
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    /// Override the result-size caps
    pub fn with_caps(mut self, max_hits: usize, max_chars: usize) -> Self {
        self.max_hits = max_hits;
        self.max_chars = max_chars;
        self
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "web_search".into(),
            description: "Search the internet for current information. Use for questions not covered by the encyclopedia or paper archive.".into(),
            parameters: vec![ParameterSchema::required_string(
                "query",
                "Search terms",
            )],
            category: Some("lookup".into()),
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call.str_arg("query").unwrap_or_default();
        if query.is_empty() {
            return Ok(ToolResult::failure("web_search", "Empty query"));
        }

        match self.source.search(query, self.max_hits).await {
            Ok(hits) => {
                let mut output = String::new();
                for (i, hit) in hits.iter().enumerate() {
                    output.push_str(&format!(
                        "{}. {}\n   {}\n   {}\n",
                        i + 1,
                        hit.title,
                        cap_chars(&hit.snippet, self.max_chars),
                        hit.url
                    ));
                }
                Ok(ToolResult::success("web_search", output.trim()))
            }
            Err(e) => {
                tracing::debug!(source = self.source.name(), error = %e, "lookup failed");
                Ok(ToolResult::failure("web_search", e.to_string()))
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
            name: "web_search".into(),
            arguments,
            id: None,
        }
    }

    #[tokio::test]
    async fn test_hits_are_numbered() {
        let tool = WebSearchTool::new(Arc::new(MockLookup::new()));
        let result = tool.execute(&call("rust async runtimes")).await.unwrap();

        assert!(result.success);
        assert!(result.output.starts_with("1. "));
        assert!(result.output.contains("\n2. "));
    }

    #[tokio::test]
    async fn test_source_error_reported_to_model() {
        let tool = WebSearchTool::new(Arc::new(MockLookup::new()));
        let result = tool.execute(&call("weather tomorrow")).await.unwrap();

        assert!(!result.success);
        assert!(result.output.contains("No results"));
    }
}
