//! # scout-runtime
//!
//! Hosted LLM providers for the scout agent.
//!
//! ## Providers
//!
//! - **Groq** (default): OpenAI-compatible chat completions at
//!   `api.groq.com`, keyed by a caller-supplied credential
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scout_runtime::GroqProvider;
//!
//! let provider = GroqProvider::new(api_key);
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

pub mod groq;

pub use groq::{GroqConfig, GroqProvider};

// Re-export core types for convenience
pub use scout_core::{
    Agent, AgentError, LlmProvider, Message, Result, Role, Session, Tool, ToolRegistry,
};
