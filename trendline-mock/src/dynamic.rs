use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use trendline_core::connector::{EntityLookup, QueryTransport, SessionProvider, TrendsConnector};
use trendline_core::{Credentials, DateWindow, Entity, QueryParams, Session, TrendsError};

use crate::fixtures;

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(TrendsError),
    /// Hang indefinitely (simulate a stalled portal).
    Hang,
}

/// Calls observed by a [`DynamicMockConnector`].
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    /// Usernames passed to `acquire`.
    pub acquires: Vec<String>,
    /// Sessions handed back through `release`.
    pub releases: Vec<Session>,
    /// Keywords passed to `lookup`, in order.
    pub lookups: Vec<String>,
    /// Export requests, in order.
    pub fetches: Vec<QueryParams>,
}

#[derive(Default)]
struct InternalState {
    acquire_rule: Option<MockBehavior<Session>>,
    lookup_rules: HashMap<String, MockBehavior<Vec<Entity>>>,
    fetch_rules: HashMap<String, MockBehavior<String>>,
    window_rules: HashMap<(String, DateWindow), MockBehavior<String>>,
    calls: CallLog,
}

async fn settle<T>(behavior: MockBehavior<T>) -> Result<T, TrendsError> {
    match behavior {
        MockBehavior::Return(v) => Ok(v),
        MockBehavior::Fail(e) => Err(e),
        MockBehavior::Hang => {
            std::future::pending::<()>().await;
            unreachable!()
        }
    }
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior of `acquire`. Unset, a cookie-less session is returned.
    pub async fn set_acquire_behavior(&self, behavior: MockBehavior<Session>) {
        self.state.lock().await.acquire_rule = Some(behavior);
    }

    /// Set the behavior of `lookup` for a keyword. Unset keywords get no candidates.
    pub async fn set_lookup_behavior(
        &self,
        keyword: impl Into<String>,
        behavior: MockBehavior<Vec<Entity>>,
    ) {
        let mut guard = self.state.lock().await;
        guard.lookup_rules.insert(keyword.into(), behavior);
    }

    /// Set the behavior of `fetch` for every window of a topic.
    ///
    /// Unset topics get a generated interest payload.
    pub async fn set_fetch_behavior(&self, topic: impl Into<String>, behavior: MockBehavior<String>) {
        let mut guard = self.state.lock().await;
        guard.fetch_rules.insert(topic.into(), behavior);
    }

    /// Override `fetch` for one exact window of a topic; wins over the topic rule.
    pub async fn set_window_behavior(
        &self,
        topic: impl Into<String>,
        window: DateWindow,
        behavior: MockBehavior<String>,
    ) {
        let mut guard = self.state.lock().await;
        guard.window_rules.insert((topic.into(), window), behavior);
    }

    /// Snapshot of the calls observed so far.
    pub async fn calls(&self) -> CallLog {
        self.state.lock().await.calls.clone()
    }

    /// Clear all configured behaviors and the call log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        *guard = InternalState::default();
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn TrendsConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn TrendsConnector>, controller)
    }
}

impl TrendsConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_session_provider(&self) -> Option<&dyn SessionProvider> {
        Some(self as &dyn SessionProvider)
    }

    fn as_query_transport(&self) -> Option<&dyn QueryTransport> {
        Some(self as &dyn QueryTransport)
    }

    fn as_entity_lookup(&self) -> Option<&dyn EntityLookup> {
        Some(self as &dyn EntityLookup)
    }
}

#[async_trait]
impl SessionProvider for DynamicMockConnector {
    async fn acquire(&self, credentials: &Credentials) -> Result<Session, TrendsError> {
        // Snapshot the rule without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.acquires.push(credentials.username.clone());
            guard.acquire_rule.clone()
        };
        match behavior {
            Some(b) => settle(b).await,
            None => Ok(Session::new(crate::MOCK_DOMAIN)),
        }
    }

    async fn release(&self, session: Session) -> Result<(), TrendsError> {
        self.state.lock().await.calls.releases.push(session);
        Ok(())
    }
}

#[async_trait]
impl EntityLookup for DynamicMockConnector {
    async fn lookup(&self, keyword: &str, _session: &Session) -> Result<Vec<Entity>, TrendsError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.lookups.push(keyword.to_string());
            guard.lookup_rules.get(keyword).cloned()
        };
        match behavior {
            Some(b) => settle(b).await,
            None => Ok(vec![]),
        }
    }
}

#[async_trait]
impl QueryTransport for DynamicMockConnector {
    async fn fetch(&self, params: &QueryParams, _session: &Session) -> Result<String, TrendsError> {
        let topic = params.topics_param();
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.calls.fetches.push(params.clone());
            guard
                .window_rules
                .get(&(topic.clone(), params.window))
                .or_else(|| guard.fetch_rules.get(&topic))
                .cloned()
        };
        match behavior {
            Some(b) => settle(b).await,
            None => Ok(fixtures::payloads::interest(&topic, params.window)),
        }
    }
}
