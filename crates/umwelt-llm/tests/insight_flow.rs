//! Insight requests driven from a live simulation.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use umwelt_core::prelude::*;
use umwelt_llm::{InsightRequester, MockBackend};
use umwelt_runtime::{FrameLoop, SteppedClock, Umwelt};

fn warmed_up() -> Umwelt {
    let mut umwelt = Umwelt::new();
    FrameLoop::new(SteppedClock::default()).run(&mut umwelt, 120, |_, _| ControlFlow::Continue(()));
    umwelt
}

#[tokio::test]
async fn snapshot_is_taken_at_trigger_time() {
    let mut umwelt = warmed_up();
    let mock = Arc::new(MockBackend::new().with_response("ok").with_delay(Duration::from_millis(10)));
    let requester = InsightRequester::new(mock.clone());

    let before = umwelt.insight_snapshot();
    let handle = requester.trigger(before.clone()).unwrap();

    // The frame loop keeps running while the request is outstanding.
    for i in 0..30 {
        umwelt.step(3_000.0 + i as f64 * 16.0);
    }
    assert!(requester.trigger(umwelt.insight_snapshot()).is_none());

    handle.await.unwrap();
    assert_eq!(mock.calls(), 1);
    assert_eq!(requester.display_text().as_deref(), Some("ok"));
    assert_eq!(before.species, "Human");
}

#[tokio::test]
async fn retrigger_after_completion_is_allowed() {
    let umwelt = warmed_up();
    let mock = Arc::new(MockBackend::new().with_response("again"));
    let requester = InsightRequester::new(mock.clone());

    requester.trigger(umwelt.insight_snapshot()).unwrap().await.unwrap();
    requester.trigger(umwelt.insight_snapshot()).unwrap().await.unwrap();
    assert_eq!(mock.calls(), 2);
    assert!(matches!(requester.state(), InsightState::Succeeded { .. }));
}
