//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern: the model either answers
//! directly or emits a JSON tool call, whose output is fed back as context
//! until a final answer is produced.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to the system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful research assistant.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Build the full system prompt including tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the agent over a conversation, returning the final answer.
    ///
    /// Intermediate assistant/tool messages accumulate in `conversation`;
    /// callers that only want the visible transcript should run on a
    /// working copy.
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String> {
        if conversation.messages().first().map(|m| m.role) != Some(Role::System) {
            let messages = conversation.messages_mut();
            messages.insert(0, Message::system(self.build_system_prompt()));
        }

        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            let content = completion.content.clone();
            conversation.push(Message::assistant(&content));

            match self.parse_tool_call(&content) {
                Ok(Some(tool_call)) => {
                    tracing::debug!(tool = %tool_call.name, "executing tool");

                    let result = self.execute_tool(&tool_call).await;
                    conversation.push(Message::tool(self.format_tool_result(&result)));
                    continue;
                }
                Ok(None) => {
                    // No tool call - this is the final response
                    return Ok(content);
                }
                Err(e) => {
                    // Malformed tool call: tell the model and let it retry
                    // rather than aborting the turn
                    tracing::warn!(error = %e, "tool call parse failure");
                    conversation.push(Message::tool(format!(
                        "[Tool call could not be parsed: {}. Re-emit the call as valid JSON or answer directly.]",
                        e
                    )));
                    continue;
                }
            }
        }
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    /// Parse a tool call from an LLM response.
    ///
    /// `Ok(None)` means a plain answer; `Err` means the response looked like
    /// a tool call but did not decode.
    fn parse_tool_call(&self, content: &str) -> Result<Option<ToolCall>> {
        let tool_start = "```tool";
        let tool_end = "```";

        if let Some(start_idx) = content.find(tool_start) {
            let after_marker = &content[start_idx + tool_start.len()..];
            if let Some(end_idx) = after_marker.find(tool_end) {
                let json_str = after_marker[..end_idx].trim();

                let mut call = serde_json::from_str::<ToolCall>(json_str)
                    .map_err(|e| AgentError::Parse(e.to_string()))?;
                if call.id.is_none() {
                    call.id = Some(uuid::Uuid::new_v4().to_string());
                }
                return Ok(Some(call));
            }
        }

        // Fallback: raw JSON object with a "tool" key, no fence
        Ok(self.parse_inline_tool_call(content))
    }

    /// Try to parse an inline JSON tool call
    fn parse_inline_tool_call(&self, content: &str) -> Option<ToolCall> {
        if !content.contains(r#""tool""#) {
            return None;
        }

        let start = content.find('{')?;
        let end = content.rfind('}')?;

        if end <= start {
            return None;
        }

        let json_str = &content[start..=end];
        serde_json::from_str::<ToolCall>(json_str).ok()
    }

    /// Execute a tool call
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id = call.id.clone();
                result
            }
            Err(e) => ToolResult {
                name: call.name.clone(),
                id: call.id.clone(),
                success: false,
                output: format!("Error: {}", e),
            },
        }
    }

    /// Format tool result for conversation
    fn format_tool_result(&self, result: &ToolResult) -> String {
        if result.success {
            format!("[Tool '{}' returned]\n{}", result.name, result.output)
        } else {
            format!("[Tool '{}' failed]\n{}", result.name, result.output)
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        Completion, CompletionStream, FinishReason, ModelInfo, ProviderInfo,
    };
    use crate::tool::{ParameterSchema, Tool, ToolSchema};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Provider that replays a fixed sequence of completions
    struct ScriptedProvider {
        responses: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(responses: &[&str]) -> Self {
            let mut responses: Vec<String> =
                responses.iter().map(|s| (*s).to_string()).collect();
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo {
                name: "scripted".into(),
                models: Vec::new(),
                supports_streaming: false,
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            let content = self
                .responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| AgentError::Provider("script exhausted".into()))?;
            Ok(Completion {
                content,
                model: options.model.clone(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            })
        }

        async fn complete_stream(
            &self,
            _messages: &[Message],
            _options: &GenerationOptions,
        ) -> Result<CompletionStream> {
            Err(AgentError::Provider("not streamed".into()))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "upper".into(),
                description: "Uppercase the input".into(),
                parameters: vec![ParameterSchema::required_string("text", "Input text")],
                category: None,
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<crate::tool::ToolResult> {
            let text = call.str_arg("text").unwrap_or_default();
            Ok(crate::tool::ToolResult::success("upper", text.to_uppercase()))
        }
    }

    fn agent_with(provider: ScriptedProvider) -> Agent {
        AgentBuilder::new()
            .provider(Arc::new(provider))
            .tool(UpperTool)
            .max_iterations(4)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_direct_answer() {
        let agent = agent_with(ScriptedProvider::new(&["Paris is the capital of France."]));
        let answer = agent.ask("Capital of France?").await.unwrap();
        assert_eq!(answer, "Paris is the capital of France.");
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let agent = agent_with(ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"hi\"}}\n```",
            "The tool says HI.",
        ]));

        let mut conv = Conversation::new();
        conv.push(Message::user("shout hi"));
        let answer = agent.run(&mut conv).await.unwrap();

        assert_eq!(answer, "The tool says HI.");
        // system + user + assistant(call) + tool + assistant(final)
        assert_eq!(conv.len(), 5);
        assert!(conv.messages()[3].content.contains("HI"));
    }

    #[tokio::test]
    async fn test_malformed_tool_call_recovers() {
        let agent = agent_with(ScriptedProvider::new(&[
            "```tool\n{not json}\n```",
            "Never mind, the answer is 42.",
        ]));

        let answer = agent.ask("meaning of life").await.unwrap();
        assert_eq!(answer, "Never mind, the answer is 42.");
    }

    #[tokio::test]
    async fn test_max_iterations() {
        let call = "```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"x\"}}\n```";
        let agent = agent_with(ScriptedProvider::new(&[call, call, call, call, call]));

        let err = agent.ask("loop forever").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations(4)));
    }

    #[test]
    fn test_parse_fenced_tool_call() {
        let agent = agent_with(ScriptedProvider::new(&[]));
        let content = "Let me look that up.\n```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"abc\"}}\n```";

        let call = agent.parse_tool_call(content).unwrap().unwrap();
        assert_eq!(call.name, "upper");
        assert!(call.id.is_some());
    }

    #[test]
    fn test_parse_inline_tool_call() {
        let agent = agent_with(ScriptedProvider::new(&[]));
        let content = r#"{"tool": "upper", "arguments": {"text": "abc"}}"#;

        let call = agent.parse_tool_call(content).unwrap().unwrap();
        assert_eq!(call.name, "upper");
    }

    #[test]
    fn test_plain_answer_is_not_a_tool_call() {
        let agent = agent_with(ScriptedProvider::new(&[]));
        assert!(agent.parse_tool_call("Just an answer.").unwrap().is_none());
    }
}
