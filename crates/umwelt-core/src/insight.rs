//! Request state for the on-demand insight commentary.
//!
//! At most one request is outstanding at any time. A trigger while
//! `Pending` is refused rather than queued, and a finished request
//! replaces whatever result was shown before.

use crate::error::InsightError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shown when the collaborator answered with an empty body.
pub const EMPTY_RESPONSE_TEXT: &str = "The model returned no commentary.";

/// Shown for every failure (transport, auth, malformed response).
pub const FALLBACK_TEXT: &str = "The insight engine is unavailable right now. Please try again.";

/// Identifies one insight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

/// What the collaborator produced for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InsightOutcome {
    /// The call succeeded; the body may be empty.
    Text(String),
    /// The call failed; the reason is for logs only.
    Failed(String),
}

/// Insight request lifecycle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum InsightState {
    #[default]
    Idle,
    Pending { id: RequestId },
    Succeeded { id: RequestId, text: String },
    Failed { id: RequestId, reason: String },
}

impl InsightState {
    pub fn is_pending(&self) -> bool {
        matches!(self, InsightState::Pending { .. })
    }

    /// Enter `Pending`. Refused while another request is outstanding.
    pub fn begin(&mut self) -> Result<RequestId, InsightError> {
        if self.is_pending() {
            return Err(InsightError::AlreadyPending);
        }
        let id = RequestId::new();
        *self = InsightState::Pending { id };
        Ok(id)
    }

    /// Record the outcome of request `id`.
    ///
    /// Returns `false` (and changes nothing) if `id` is not the pending
    /// request.
    pub fn resolve(&mut self, id: RequestId, outcome: InsightOutcome) -> bool {
        match self {
            InsightState::Pending { id: pending } if *pending == id => {}
            _ => return false,
        }
        *self = match outcome {
            InsightOutcome::Text(text) if text.trim().is_empty() => InsightState::Succeeded {
                id,
                text: EMPTY_RESPONSE_TEXT.to_string(),
            },
            InsightOutcome::Text(text) => InsightState::Succeeded { id, text },
            InsightOutcome::Failed(reason) => InsightState::Failed { id, reason },
        };
        true
    }

    /// The text a user should see, if any.
    pub fn display_text(&self) -> Option<&str> {
        match self {
            InsightState::Idle | InsightState::Pending { .. } => None,
            InsightState::Succeeded { text, .. } => Some(text),
            InsightState::Failed { .. } => Some(FALLBACK_TEXT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_refused_while_pending() {
        let mut state = InsightState::default();
        let id = state.begin().unwrap();
        assert!(state.is_pending());
        assert_eq!(state.begin(), Err(InsightError::AlreadyPending));
        assert_eq!(state, InsightState::Pending { id });
    }

    #[test]
    fn success_text_is_shown_verbatim() {
        let mut state = InsightState::default();
        let id = state.begin().unwrap();
        assert!(state.resolve(id, InsightOutcome::Text("  a thought\n".into())));
        assert_eq!(state.display_text(), Some("  a thought\n"));
    }

    #[test]
    fn empty_body_uses_placeholder() {
        let mut state = InsightState::default();
        let id = state.begin().unwrap();
        state.resolve(id, InsightOutcome::Text("   ".into()));
        assert_eq!(state.display_text(), Some(EMPTY_RESPONSE_TEXT));
    }

    #[test]
    fn failure_shows_fallback_not_reason() {
        let mut state = InsightState::default();
        let id = state.begin().unwrap();
        state.resolve(id, InsightOutcome::Failed("401 unauthorized".into()));
        assert_eq!(state.display_text(), Some(FALLBACK_TEXT));
        assert!(matches!(state, InsightState::Failed { ref reason, .. } if reason.contains("401")));
    }

    #[test]
    fn stale_resolution_is_ignored() {
        let mut state = InsightState::default();
        let stale = RequestId::new();
        assert!(!state.resolve(stale, InsightOutcome::Text("x".into())));
        assert_eq!(state, InsightState::Idle);

        let id = state.begin().unwrap();
        assert!(!state.resolve(stale, InsightOutcome::Text("x".into())));
        assert_eq!(state, InsightState::Pending { id });
    }

    #[test]
    fn new_request_replaces_previous_result() {
        let mut state = InsightState::default();
        let first = state.begin().unwrap();
        state.resolve(first, InsightOutcome::Text("first".into()));

        let second = state.begin().unwrap();
        assert_eq!(state.display_text(), None);
        state.resolve(second, InsightOutcome::Text("second".into()));
        assert_eq!(state.display_text(), Some("second"));
    }
}
