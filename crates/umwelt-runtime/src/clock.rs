//! Frame scheduling.
//!
//! The simulation itself is a pure `step(now)`; this module decides *when*
//! frames happen. [`SystemClock`] follows the wall clock, [`SteppedClock`]
//! advances by a fixed amount per frame so runs are reproducible.

use crate::umwelt::{StepReport, Umwelt};
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use umwelt_core::types::Millis;

/// Default display refresh rate for headless runs.
pub const DEFAULT_FPS: f64 = 60.0;

/// Source of frame timestamps.
pub trait FrameClock {
    /// Timestamp for the next frame, in ms since the clock started.
    fn tick(&mut self) -> Millis;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn tick(&mut self) -> Millis {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Fixed step per frame, independent of real time.
#[derive(Debug, Clone)]
pub struct SteppedClock {
    now: Millis,
    step: Millis,
}

impl SteppedClock {
    pub fn new(step: Millis) -> Self {
        Self { now: 0.0, step }
    }

    /// Step matching a display refreshing at `fps`.
    pub fn at_fps(fps: f64) -> Self {
        Self::new(1000.0 / fps.max(1.0))
    }

    pub fn now(&self) -> Millis {
        self.now
    }
}

impl Default for SteppedClock {
    fn default() -> Self {
        Self::at_fps(DEFAULT_FPS)
    }
}

impl FrameClock for SteppedClock {
    fn tick(&mut self) -> Millis {
        self.now += self.step;
        self.now
    }
}

/// Drives an [`Umwelt`] one frame at a time.
///
/// Frames are strictly sequential; the callback sees the state after each
/// step and may stop the loop early.
pub struct FrameLoop<C: FrameClock> {
    clock: C,
    frame_budget: Option<Duration>,
}

impl<C: FrameClock> FrameLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            frame_budget: None,
        }
    }

    /// Sleep between frames so the loop runs no faster than `fps`.
    pub fn paced(mut self, fps: f64) -> Self {
        self.frame_budget = Some(Duration::from_secs_f64(1.0 / fps.max(1.0)));
        self
    }

    /// Run up to `frames` frames. Returns how many were run.
    pub fn run<F>(&mut self, umwelt: &mut Umwelt, frames: u64, mut on_frame: F) -> u64
    where
        F: FnMut(&Umwelt, &StepReport) -> ControlFlow<()>,
    {
        let mut ran = 0;
        while ran < frames {
            let started = Instant::now();
            let now = self.clock.tick();
            let report = umwelt.step(now);
            ran += 1;

            if on_frame(umwelt, &report).is_break() {
                break;
            }

            if let Some(budget) = self.frame_budget {
                if let Some(rest) = budget.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }
        ran
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepped_clock_advances_by_fixed_step() {
        let mut clock = SteppedClock::new(10.0);
        assert_eq!(clock.tick(), 10.0);
        assert_eq!(clock.tick(), 20.0);
        assert_eq!(clock.now(), 20.0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert!(b >= a);
    }

    #[test]
    fn loop_runs_requested_frames() {
        let mut umwelt = Umwelt::new();
        let mut lp = FrameLoop::new(SteppedClock::default());
        let mut seen = 0;
        let ran = lp.run(&mut umwelt, 90, |_, _| {
            seen += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(ran, 90);
        assert_eq!(seen, 90);
        assert_eq!(umwelt.frame(), 90);
        assert!((lp.clock().now() - 1500.0).abs() < 1e-6);
    }

    #[test]
    fn callback_can_stop_the_loop() {
        let mut umwelt = Umwelt::new();
        let mut lp = FrameLoop::new(SteppedClock::default());
        let ran = lp.run(&mut umwelt, 1_000, |u, _| {
            if u.history().len() >= 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(ran < 1_000);
        assert_eq!(umwelt.history().len(), 3);
    }

    #[test]
    fn paced_loop_takes_real_time() {
        let mut umwelt = Umwelt::new();
        let mut lp = FrameLoop::new(SystemClock::new()).paced(200.0);
        let start = Instant::now();
        lp.run(&mut umwelt, 10, |_, _| ControlFlow::Continue(()));
        // 10 frames at 5 ms each.
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
