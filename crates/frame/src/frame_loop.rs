use std::time::Duration;

use crate::clock::FrameClock;
use crate::timer::FrameTimer;

/// Drives per-frame stepping until the step function asks to stop.
///
/// Each iteration measures the delta, records it, and hands it to the step
/// function, which advances continuous state, lets the input controller
/// update, and invokes the renderer. Edits are delivered between steps as
/// independent calls and never stall the loop.
#[derive(Debug, Default)]
pub struct FrameLoop {
    clock: FrameClock,
    timer: FrameTimer,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            clock: FrameClock::new(),
            timer: FrameTimer::new(120),
            frames: 0,
        }
    }

    /// Run until `step` returns `false` or `max_frames` is reached.
    pub fn run<F>(&mut self, max_frames: Option<u64>, mut step: F)
    where
        F: FnMut(Duration) -> bool,
    {
        loop {
            if let Some(max) = max_frames {
                if self.frames >= max {
                    break;
                }
            }
            if !self.step(&mut step) {
                break;
            }
        }
        tracing::debug!(
            frames = self.frames,
            avg = ?self.timer.average(),
            "frame loop stopped"
        );
    }

    /// Advance exactly one frame.
    pub fn step<F>(&mut self, step: &mut F) -> bool
    where
        F: FnMut(Duration) -> bool,
    {
        let delta = self.clock.tick();
        self.timer.record(delta);
        self.frames += 1;
        step(delta)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_stops_at_max_frames() {
        let mut frame_loop = FrameLoop::new();
        let mut ticks = 0;
        frame_loop.run(Some(5), |_| {
            ticks += 1;
            true
        });
        assert_eq!(ticks, 5);
        assert_eq!(frame_loop.frames(), 5);
    }

    #[test]
    fn loop_stops_when_step_declines() {
        let mut frame_loop = FrameLoop::new();
        let mut ticks = 0;
        frame_loop.run(None, |_| {
            ticks += 1;
            ticks < 3
        });
        assert_eq!(ticks, 3);
    }
}
