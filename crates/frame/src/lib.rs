//! Frame loop: measured per-frame deltas driving time-integrated state.
//!
//! # Invariants
//! - Integration uses the measured delta, never a fixed step, so rates stay
//!   frame-rate independent.
//! - The loop never blocks on asset loads or edits; those run between steps.

mod clock;
mod frame_loop;
mod motion;
mod timer;

pub use clock::FrameClock;
pub use frame_loop::FrameLoop;
pub use motion::ContinuousState;
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    "shimmer-frame v0.1.0"
}
