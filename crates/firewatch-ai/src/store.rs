//! In-memory conversation store keyed by thread id.
//!
//! Thread state has process lifetime only; nothing is persisted across
//! restarts.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::Message;

/// Handle to one thread's message history. The mutex is held for the whole
/// duration of a chat run, so concurrent requests for the same thread
/// queue up instead of interleaving their writes.
pub type ThreadHandle = Arc<Mutex<Vec<Message>>>;

/// A `{role, content}` entry in the externally visible history.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

/// Thread-safe conversation store.
#[derive(Clone, Default)]
pub struct ConversationStore {
    threads: Arc<RwLock<HashMap<String, ThreadHandle>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the thread with the given id.
    pub async fn thread(&self, id: &str) -> ThreadHandle {
        {
            let map = self.threads.read().await;
            if let Some(handle) = map.get(id) {
                return handle.clone();
            }
        }
        let mut map = self.threads.write().await;
        map.entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone()
    }

    /// Snapshot of a thread's full message list, or empty if it does not
    /// exist.
    pub async fn history(&self, id: &str) -> Vec<Message> {
        let handle = {
            let map = self.threads.read().await;
            map.get(id).cloned()
        };
        match handle {
            Some(handle) => handle.lock().await.clone(),
            None => Vec::new(),
        }
    }

    /// The filtered conversation view: human turns as `user`, final ai
    /// turns as `ai`. System, tool-call, and tool-result messages are
    /// internal and omitted.
    pub async fn visible_history(&self, id: &str) -> Vec<HistoryEntry> {
        self.history(id)
            .await
            .into_iter()
            .filter_map(|msg| match msg {
                Message::Human { content } => Some(HistoryEntry {
                    role: "user".to_string(),
                    content,
                }),
                Message::Ai {
                    content,
                    tool_calls,
                } if tool_calls.is_empty() => Some(HistoryEntry {
                    role: "ai".to_string(),
                    content,
                }),
                _ => None,
            })
            .collect()
    }

    /// Number of threads in the store.
    pub async fn thread_count(&self) -> usize {
        self.threads.read().await.len()
    }
}
