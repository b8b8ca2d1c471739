//! On-demand insight requests with an at-most-one-in-flight policy.
//!
//! The requester works from an [`InsightSnapshot`] taken at trigger time
//! and never touches simulation state. Every failure collapses to the
//! fixed fallback text; the underlying [`LlmError`](crate::LlmError) is
//! only logged.

use crate::backend::LlmBackend;
use crate::prompt::{InsightPrompt, PromptTemplate};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use umwelt_core::error::InsightError;
use umwelt_core::insight::{InsightOutcome, InsightState, RequestId};
use umwelt_core::types::InsightSnapshot;

/// Issue exactly one completion for `snapshot`.
///
/// Never fails: errors become [`InsightOutcome::Failed`].
pub async fn request_insight(backend: &dyn LlmBackend, snapshot: &InsightSnapshot) -> InsightOutcome {
    let prompt = InsightPrompt::new(snapshot.clone());
    let system = prompt.system_prompt();
    debug!(
        backend = backend.name(),
        model = %backend.config().model,
        effort = %backend.config().reasoning_effort,
        species = %snapshot.species,
        "requesting insight"
    );
    match backend
        .complete_with_system(&prompt.generate(), system.as_deref())
        .await
    {
        Ok(text) => InsightOutcome::Text(text),
        Err(e) => {
            warn!(backend = backend.name(), error = %e, "insight request failed");
            InsightOutcome::Failed(e.to_string())
        }
    }
}

/// Drives insight requests against one backend and tracks their state.
///
/// Cloning shares the backend and the state.
#[derive(Clone)]
pub struct InsightRequester {
    backend: Arc<dyn LlmBackend>,
    state: Arc<Mutex<InsightState>>,
}

impl InsightRequester {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(InsightState::default())),
        }
    }

    pub fn backend(&self) -> &dyn LlmBackend {
        self.backend.as_ref()
    }

    /// Current request state.
    pub fn state(&self) -> InsightState {
        self.lock().clone()
    }

    /// True while a request is outstanding; a trigger is a no-op then.
    pub fn is_pending(&self) -> bool {
        self.lock().is_pending()
    }

    /// The text a user should see for the latest finished request.
    pub fn display_text(&self) -> Option<String> {
        self.lock().display_text().map(str::to_string)
    }

    /// Start a request in the background on the current tokio runtime.
    ///
    /// Returns `None` without calling the backend if one is already pending.
    /// If the task panics or is aborted the request resolves as failed.
    pub fn trigger(&self, snapshot: InsightSnapshot) -> Option<JoinHandle<()>> {
        let pending = match self.begin() {
            Ok(pending) => pending,
            Err(_) => {
                debug!("insight request already pending; trigger ignored");
                return None;
            }
        };
        let backend = Arc::clone(&self.backend);
        Some(tokio::spawn(async move {
            let outcome = request_insight(backend.as_ref(), &snapshot).await;
            pending.finish(outcome);
        }))
    }

    /// Run a request to completion and return the text to display.
    ///
    /// Dropping the returned future before it completes resolves the
    /// request as failed, so a later trigger is accepted.
    pub async fn request(&self, snapshot: InsightSnapshot) -> Result<String, InsightError> {
        let pending = self.begin()?;
        let outcome = request_insight(self.backend.as_ref(), &snapshot).await;
        pending.finish(outcome);
        let text = self.lock().display_text().map(str::to_string);
        Ok(text.unwrap_or_default())
    }

    fn begin(&self) -> Result<PendingRequest, InsightError> {
        let id = self.lock().begin()?;
        Ok(PendingRequest {
            state: Arc::clone(&self.state),
            id,
            settled: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, InsightState> {
        lock_state(&self.state)
    }
}

/// The outstanding request. Resolves the state as failed if dropped
/// without [`finish`](PendingRequest::finish).
struct PendingRequest {
    state: Arc<Mutex<InsightState>>,
    id: RequestId,
    settled: bool,
}

impl PendingRequest {
    fn finish(mut self, outcome: InsightOutcome) {
        self.settled = true;
        self.resolve(outcome);
    }

    fn resolve(&self, outcome: InsightOutcome) {
        if !lock_state(&self.state).resolve(self.id, outcome) {
            debug!(id = ?self.id, "stale insight result dropped");
        }
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        if !self.settled {
            warn!(id = ?self.id, "insight request dropped before completing");
            self.resolve(InsightOutcome::Failed("request cancelled".to_string()));
        }
    }
}

// A panic while holding the lock cannot leave the state half-written.
fn lock_state(state: &Mutex<InsightState>) -> MutexGuard<'_, InsightState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LlmConfig, LlmResult, MockBackend};
    use async_trait::async_trait;
    use std::time::Duration;
    use umwelt_core::insight::{EMPTY_RESPONSE_TEXT, FALLBACK_TEXT};

    fn snapshot() -> InsightSnapshot {
        InsightSnapshot {
            species: "Pigeon".to_string(),
            sampling_rate_hz: 100.0,
            integration_window: 15,
            attention_bias: 0.85,
            transparency: 72.4,
        }
    }

    #[tokio::test]
    async fn double_trigger_issues_one_request() {
        let mock = Arc::new(MockBackend::new().with_response("Pigeons see fast.").with_delay(Duration::from_millis(20)));
        let requester = InsightRequester::new(mock.clone());

        let first = requester.trigger(snapshot());
        let second = requester.trigger(snapshot());
        assert!(first.is_some());
        assert!(second.is_none());
        assert!(requester.is_pending());

        first.unwrap().await.unwrap();
        assert_eq!(mock.calls(), 1);
        assert!(!requester.is_pending());
        assert_eq!(requester.display_text().as_deref(), Some("Pigeons see fast."));
    }

    #[tokio::test]
    async fn request_while_pending_is_refused() {
        let mock = Arc::new(MockBackend::new().with_delay(Duration::from_millis(20)));
        let requester = InsightRequester::new(mock.clone());

        let handle = requester.trigger(snapshot()).unwrap();
        assert_eq!(requester.request(snapshot()).await, Err(InsightError::AlreadyPending));
        handle.await.unwrap();
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn failure_shows_fallback() {
        let requester = InsightRequester::new(Arc::new(MockBackend::new().failing()));
        let text = requester.request(snapshot()).await.unwrap();
        assert_eq!(text, FALLBACK_TEXT);
        assert!(matches!(requester.state(), InsightState::Failed { .. }));
    }

    #[tokio::test]
    async fn empty_body_shows_placeholder() {
        let requester = InsightRequester::new(Arc::new(MockBackend::new().with_response("  \n")));
        assert_eq!(requester.request(snapshot()).await.unwrap(), EMPTY_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn new_result_replaces_previous() {
        let requester = InsightRequester::new(Arc::new(MockBackend::new().with_response("first")));
        assert_eq!(requester.request(snapshot()).await.unwrap(), "first");

        let failing = InsightRequester {
            backend: Arc::new(MockBackend::new().failing()),
            state: requester.state.clone(),
        };
        assert_eq!(failing.request(snapshot()).await.unwrap(), FALLBACK_TEXT);
        assert_eq!(requester.display_text().as_deref(), Some(FALLBACK_TEXT));
    }

    #[tokio::test]
    async fn request_insight_passes_text_verbatim() {
        let mock = MockBackend::new().with_response("  spaced  ");
        match request_insight(&mock, &snapshot()).await {
            InsightOutcome::Text(t) => assert_eq!(t, "  spaced  "),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    struct PanickingBackend {
        config: LlmConfig,
    }

    #[async_trait]
    impl LlmBackend for PanickingBackend {
        fn name(&self) -> &str {
            "panicking"
        }

        fn config(&self) -> &LlmConfig {
            &self.config
        }

        async fn complete_with_system(&self, _prompt: &str, _system: Option<&str>) -> LlmResult<String> {
            panic!("backend blew up");
        }
    }

    #[tokio::test]
    async fn cancelled_request_releases_the_trigger() {
        let mock = Arc::new(MockBackend::new().with_response("late").with_delay(Duration::from_millis(200)));
        let requester = InsightRequester::new(mock.clone());

        let timed_out = tokio::time::timeout(Duration::from_millis(10), requester.request(snapshot())).await;
        assert!(timed_out.is_err());

        assert!(!requester.is_pending());
        assert!(matches!(requester.state(), InsightState::Failed { .. }));
        assert_eq!(requester.display_text().as_deref(), Some(FALLBACK_TEXT));

        let handle = requester.trigger(snapshot()).expect("trigger accepted after cancellation");
        handle.await.unwrap();
        assert_eq!(requester.display_text().as_deref(), Some("late"));
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn aborted_task_releases_the_trigger() {
        let requester = InsightRequester::new(Arc::new(MockBackend::new().with_delay(Duration::from_secs(5))));

        let handle = requester.trigger(snapshot()).unwrap();
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());

        assert!(!requester.is_pending());
        assert_eq!(requester.display_text().as_deref(), Some(FALLBACK_TEXT));
    }

    #[tokio::test]
    async fn panicking_backend_releases_the_trigger() {
        let requester = InsightRequester::new(Arc::new(PanickingBackend {
            config: LlmConfig::default(),
        }));

        let handle = requester.trigger(snapshot()).unwrap();
        assert!(handle.await.unwrap_err().is_panic());

        assert!(!requester.is_pending());
        assert_eq!(requester.display_text().as_deref(), Some(FALLBACK_TEXT));
        assert!(requester.trigger(snapshot()).is_some());
    }
}
