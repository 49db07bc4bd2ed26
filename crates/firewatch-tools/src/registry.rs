//! Tool registry: resolves model tool calls by name and executes them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use firewatch_ai::{ToolCall, ToolDefinition, ToolDispatcher};

/// One executable tool.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The definition advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool. Failures must be rendered into the output string.
    async fn call(&self, arguments: &serde_json::Value) -> String;
}

/// The fixed set of tools available to the model.
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn ToolHandler>>,
    call_timeout: Duration,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            call_timeout: Duration::from_secs(30),
        }
    }

    pub fn register(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolDispatcher for ToolRegistry {
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.handlers.iter().map(|h| h.definition()).collect()
    }

    async fn dispatch(&self, call: &ToolCall) -> String {
        let Some(handler) = self
            .handlers
            .iter()
            .find(|h| h.definition().name == call.name)
        else {
            warn!(tool = %call.name, "model requested an unknown tool");
            return format!("Error: unknown tool '{}'", call.name);
        };

        debug!(tool = %call.name, "dispatching tool call");
        match tokio::time::timeout(self.call_timeout, handler.call(&call.arguments)).await {
            Ok(output) => output,
            Err(_) => {
                warn!(tool = %call.name, "tool call timed out");
                format!("Error: tool '{}' timed out", call.name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SleepyTool;

    #[async_trait]
    impl ToolHandler for SleepyTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "sleepy".to_string(),
                description: "Sleeps.".to_string(),
                parameters: serde_json::json!({"type": "object"}),
            }
        }

        async fn call(&self, _arguments: &serde_json::Value) -> String {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "done".to_string()
        }
    }

    fn call(name: &str) -> ToolCall {
        ToolCall {
            id: "c1".to_string(),
            name: name.to_string(),
            arguments: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn unknown_tool_returns_error_string() {
        let registry = ToolRegistry::new();
        let output = registry.dispatch(&call("summon_rain")).await;
        assert_eq!(output, "Error: unknown tool 'summon_rain'");
    }

    #[tokio::test]
    async fn slow_tool_times_out_into_error_string() {
        let registry = ToolRegistry::new()
            .register(Arc::new(SleepyTool))
            .with_call_timeout(Duration::from_millis(20));
        let output = registry.dispatch(&call("sleepy")).await;
        assert_eq!(output, "Error: tool 'sleepy' timed out");
    }

    #[tokio::test]
    async fn definitions_preserve_registration_order() {
        let registry = ToolRegistry::new().register(Arc::new(SleepyTool));
        let definitions = registry.definitions();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name, "sleepy");
    }
}
