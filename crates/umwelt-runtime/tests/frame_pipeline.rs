//! Frame pipeline integration tests - world, sampling, transparency together.

use std::ops::ControlFlow;
use umwelt_core::prelude::*;
use umwelt_runtime::history::HistoryBuffer;
use umwelt_runtime::transparency;
use umwelt_runtime::{FrameClock, FrameLoop, SteppedClock, Umwelt, UmweltConfig};

/// A display that stutters: frame gaps cycle through a fixed pattern.
struct JitteryClock {
    now: Millis,
    gaps: Vec<Millis>,
    i: usize,
}

impl FrameClock for JitteryClock {
    fn tick(&mut self) -> Millis {
        self.now += self.gaps[self.i % self.gaps.len()];
        self.i += 1;
        self.now
    }
}

#[test]
fn sample_spacing_holds_under_irregular_frames() {
    for preset in SpeciesProfile::presets() {
        let rate = preset.sampling_rate_hz;
        let mut umwelt = Umwelt::from_config(UmweltConfig { seed: 11, profile: preset });
        let clock = JitteryClock {
            now: 0.0,
            gaps: vec![16.7, 2.0, 33.0, 8.3, 120.0, 16.6, 0.5],
            i: 0,
        };
        let mut timestamps = Vec::new();
        FrameLoop::new(clock).run(&mut umwelt, 3_000, |_, report| {
            if let Some(s) = report.sampled {
                timestamps.push(s.timestamp);
            }
            ControlFlow::Continue(())
        });

        assert!(timestamps.len() > 1);
        for pair in timestamps.windows(2) {
            assert!(pair[1] - pair[0] >= 1000.0 / rate);
        }
        assert!(umwelt.history().len() <= HISTORY_CAPACITY);
    }
}

#[test]
fn reference_transparency_scenario() {
    let human = SpeciesProfile::human();
    let mut history = HistoryBuffer::new();
    history.push(HistorySample::new(Position::new(150.0, 100.0), 50.0));
    history.push(HistorySample::new(Position::new(160.0, 100.0), 100.0));

    let index = transparency::update(0.0, &history, human.sampling_rate_hz);
    assert!((index - 9.792).abs() < 1e-3, "got {index}");
}

#[test]
fn preset_switching_mid_session() {
    let mut umwelt = Umwelt::from_config(UmweltConfig {
        seed: 7,
        profile: SpeciesProfile::tortoise(),
    });
    let mut lp = FrameLoop::new(SteppedClock::default());

    lp.run(&mut umwelt, 900, |_, _| ControlFlow::Continue(()));
    let held = umwelt.history().len();
    assert!(held > SpeciesProfile::housefly().integration_window);

    for name in ["Housefly", "Pigeon", "Human", "Tortoise", "Housefly"] {
        umwelt.select_preset(name).unwrap();
        assert!(umwelt.effective_window() <= umwelt.history().len());
        assert!(umwelt.effective_window() <= umwelt.profile().integration_window);
        lp.run(&mut umwelt, 30, |_, _| ControlFlow::Continue(()));
    }
    assert_eq!(umwelt.profile().name, "Housefly");
}

#[test]
fn same_seed_same_run() {
    let run = || {
        let mut umwelt = Umwelt::from_config(UmweltConfig { seed: 99, ..Default::default() });
        FrameLoop::new(SteppedClock::default()).run(&mut umwelt, 600, |_, _| {
            ControlFlow::Continue(())
        });
        umwelt.stats()
    };
    assert_eq!(run(), run());
}
