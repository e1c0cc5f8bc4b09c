//! Application State

use std::sync::Arc;

use scout_core::{LlmProvider, MemorySessionStore, ToolRegistry};

/// Builds a provider for a caller-supplied API key.
///
/// The credential arrives with each chat request, so providers are
/// constructed per request rather than held in state.
pub type ProviderFactory = Arc<dyn Fn(&str) -> Arc<dyn LlmProvider> + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tool registry with all available lookup tools
    pub tools: Arc<ToolRegistry>,

    /// In-memory chat sessions
    pub sessions: Arc<MemorySessionStore>,

    /// Provider factory (credential -> provider)
    pub make_provider: ProviderFactory,

    /// Server-side fallback key (`GROQ_API_KEY`), used when the request
    /// carries none
    pub default_api_key: Option<String>,
}

impl AppState {
    /// Resolve the credential for a request: the caller's key wins, the
    /// environment fallback is second, and `None` gates all network use
    pub fn resolve_api_key(&self, supplied: Option<&str>) -> Option<String> {
        supplied
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .or_else(|| self.default_api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_default(default_api_key: Option<&str>) -> AppState {
        AppState {
            tools: Arc::new(ToolRegistry::new()),
            sessions: Arc::new(MemorySessionStore::new()),
            make_provider: Arc::new(|_| unreachable!("no provider needed")),
            default_api_key: default_api_key.map(String::from),
        }
    }

    #[test]
    fn test_request_key_wins_over_default() {
        let state = state_with_default(Some("gsk_env"));
        assert_eq!(
            state.resolve_api_key(Some("gsk_user")).as_deref(),
            Some("gsk_user")
        );
    }

    #[test]
    fn test_blank_key_falls_back_to_default() {
        let state = state_with_default(Some("gsk_env"));
        assert_eq!(state.resolve_api_key(Some("   ")).as_deref(), Some("gsk_env"));
    }

    #[test]
    fn test_no_key_anywhere_gates_access() {
        let state = state_with_default(None);
        assert!(state.resolve_api_key(None).is_none());
        assert!(state.resolve_api_key(Some("")).is_none());
    }
}
