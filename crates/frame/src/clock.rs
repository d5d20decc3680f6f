use std::time::{Duration, Instant};

/// Measures elapsed time between ticks.
///
/// The first tick reports zero so startup does not integrate a jump covering
/// however long initialization took.
#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    /// Tick against an injected timestamp.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        delta
    }
}
