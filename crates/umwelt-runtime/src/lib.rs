//! # Umwelt Runtime
//!
//! The per-frame pipeline of a perceiving agent.
//!
//! Each frame:
//! 1. The world point moves toward its target (every tick, display rate)
//! 2. If a sampling interval has elapsed, the position is captured
//! 3. A captured sample updates the transparency index
//! 4. The renderer reads the resulting state
//!
//! Motion and perception deliberately run at different rates: the world is
//! continuous, the agent's view of it is discrete.

pub mod world;
pub mod history;
pub mod transparency;
pub mod attention;
pub mod umwelt;
pub mod clock;

pub use umwelt::{Umwelt, UmweltConfig, UmweltStats, UmweltSnapshot, StepReport};
pub use clock::{FrameClock, FrameLoop, SteppedClock, SystemClock};
