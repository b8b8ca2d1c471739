//! Sampling & History Buffer - the agent's discrete record of the world.
//!
//! The world moves every tick, but the agent only captures a sample when a
//! full sampling interval has elapsed (flicker fusion). Captured samples go
//! into a bounded FIFO log.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use umwelt_core::prelude::*;

/// Decide whether `position` is captured at time `now`.
///
/// Returns the new last-sample time and the captured sample, if any. A
/// sample is taken only when strictly more than `1000 / rate_hz` ms have
/// passed since `last_sample`. The sample is stamped with `now`, so timing
/// drift accumulates rather than being corrected.
pub fn maybe_sample(
    position: Position,
    now: Millis,
    last_sample: Millis,
    rate_hz: f64,
) -> (Millis, Option<HistorySample>) {
    if !rate_hz.is_finite() || rate_hz <= 0.0 {
        return (last_sample, None);
    }
    let interval = 1000.0 / rate_hz;
    if now - last_sample > interval {
        (now, Some(HistorySample::new(position, now)))
    } else {
        (last_sample, None)
    }
}

/// Fixed-capacity, append-only log of accepted samples, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryBuffer {
    samples: VecDeque<HistorySample>,
    capacity: usize,
    /// Total samples ever accepted, including evicted ones.
    accepted: u64,
}

impl HistoryBuffer {
    /// Buffer with the standard capacity of [`HISTORY_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            accepted: 0,
        }
    }

    /// Append a sample, evicting the oldest ones beyond capacity.
    pub fn push(&mut self, sample: HistorySample) {
        self.samples.push_back(sample);
        self.accepted += 1;
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.back()
    }

    /// The two most recent samples as `(previous, latest)`.
    pub fn last_pair(&self) -> Option<(&HistorySample, &HistorySample)> {
        let n = self.samples.len();
        if n < 2 {
            return None;
        }
        Some((&self.samples[n - 2], &self.samples[n - 1]))
    }

    /// The most recent `window` samples, oldest first.
    ///
    /// Clamped to what is available: asking for more than `len()` returns
    /// everything.
    pub fn trailing(&self, window: usize) -> impl ExactSizeIterator<Item = &HistorySample> {
        let skip = self.samples.len().saturating_sub(window);
        self.samples.iter().skip(skip)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &HistorySample> {
        self.samples.iter()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
