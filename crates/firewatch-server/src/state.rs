//! Shared state for the HTTP layer.
//!
//! Everything is constructed explicitly at startup and threaded through the
//! handlers; there are no module-level singletons.

use std::sync::Arc;

use firewatch_ai::{ChatAgent, ConversationStore};
use firewatch_firms::FirmsClient;
use firewatch_vision::DetectorClient;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    agent: ChatAgent,
    store: ConversationStore,
    firms: Arc<FirmsClient>,
    detector: Option<DetectorClient>,
}

impl AppState {
    pub fn new(
        agent: ChatAgent,
        store: ConversationStore,
        firms: Arc<FirmsClient>,
        detector: Option<DetectorClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                agent,
                store,
                firms,
                detector,
            }),
        }
    }

    pub fn agent(&self) -> &ChatAgent {
        &self.inner.agent
    }

    pub fn store(&self) -> &ConversationStore {
        &self.inner.store
    }

    pub fn firms(&self) -> &FirmsClient {
        &self.inner.firms
    }

    pub fn detector(&self) -> Option<&DetectorClient> {
        self.inner.detector.as_ref()
    }
}
