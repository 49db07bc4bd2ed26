//! The conversational agent: an iterative model/tool decision loop.
//!
//! Each chat turn sends the thread's history to the model. If the model
//! requests tool calls, they are dispatched (concurrently), their results
//! appended, and the updated history sent back, until the model produces a
//! final answer or the round cap is hit.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::debug;

use crate::store::ConversationStore;
use crate::{AiClient, AiError, Message, ToolCall, ToolDefinition};

/// Executes tool calls requested by the model.
///
/// Dispatch never fails: unknown tools, timeouts, and handler errors are all
/// rendered into the returned string so the model can see and react to them.
#[async_trait]
pub trait ToolDispatcher: Send + Sync {
    /// Definitions advertised to the model.
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Execute one call and return its output text.
    async fn dispatch(&self, call: &ToolCall) -> String;
}

/// A conversational agent bound to a model client, a tool set, and a
/// conversation store.
pub struct ChatAgent {
    client: Arc<dyn AiClient>,
    tools: Arc<dyn ToolDispatcher>,
    store: ConversationStore,
    system_prompt: Option<String>,
    /// Maximum tool-call loop iterations to prevent unbounded looping.
    max_tool_rounds: u32,
}

impl ChatAgent {
    pub fn new(
        client: Arc<dyn AiClient>,
        tools: Arc<dyn ToolDispatcher>,
        store: ConversationStore,
    ) -> Self {
        Self {
            client,
            tools,
            store,
            system_prompt: None,
            max_tool_rounds: 10,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Add a user message to the thread and run the loop to the final
    /// answer. Holds the thread lock for the whole run, so concurrent calls
    /// for the same thread id are serialized.
    pub async fn chat(
        &self,
        thread_id: &str,
        user_message: impl Into<String>,
    ) -> Result<String, AiError> {
        let handle = self.store.thread(thread_id).await;
        let mut history = handle.lock().await;

        history.push(Message::human(user_message));

        let definitions = self.tools.definitions();
        let mut rounds = 0;

        loop {
            let messages = self.build_messages(&history);
            let response = self.client.send_message(&messages, &definitions).await?;
            debug!(
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "model response"
            );

            if response.tool_calls.is_empty() {
                // No tool calls — we have the final response
                history.push(Message::ai(response.content.clone()));
                return Ok(response.content);
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                debug!("Max tool rounds reached, returning partial response");
                history.push(Message::ai(response.content.clone()));
                return Ok(response.content);
            }

            history.push(Message::Ai {
                content: response.content.clone(),
                tool_calls: response.tool_calls.clone(),
            });

            // Dispatch every requested call concurrently; all results are
            // awaited before the next model round, in request order.
            let results = join_all(response.tool_calls.iter().map(|call| async move {
                debug!(tool = %call.name, "Executing tool");
                (call.id.clone(), self.tools.dispatch(call).await)
            }))
            .await;

            for (call_id, output) in results {
                history.push(Message::tool(output, call_id));
            }
        }
    }

    fn build_messages(&self, history: &[Message]) -> Vec<Message> {
        let mut messages = Vec::new();
        if let Some(ref system) = self.system_prompt {
            messages.push(Message::system(system.clone()));
        }
        messages.extend_from_slice(history);
        messages
    }
}
