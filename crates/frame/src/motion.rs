use std::time::Duration;

/// A time-integrated quantity advanced by rate × elapsed seconds each frame.
///
/// The spin angle of the scene is one of these. The rate is a live field so
/// a Direct binding can write it between frames without touching geometry.
#[derive(Debug, Clone, Copy)]
pub struct ContinuousState {
    value: f32,
    rate: f32,
}

impl ContinuousState {
    pub fn new(rate: f32) -> Self {
        Self { value: 0.0, rate }
    }

    /// Advance by the measured frame delta.
    pub fn advance(&mut self, delta: Duration) {
        self.value += self.rate * delta.as_secs_f32();
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }
}
