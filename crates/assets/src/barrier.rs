/// State observed after a completion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierState {
    /// Still waiting on outstanding loads.
    Pending { expected: u32, received: u32 },
    /// All expected loads have completed. Terminal.
    Ready,
}

/// Errors from barrier signaling.
#[derive(Debug, thiserror::Error)]
pub enum BarrierError {
    #[error("completion signal received after barrier fired ({expected} loads expected)")]
    ExtraSignal { expected: u32 },
}

/// Counts completion of N independently resolving loads.
///
/// `signal()` returns the transition to [`BarrierState::Ready`] exactly once,
/// on the signal that completes the set. Signals beyond the expected count
/// are a caller error: they are reported and do not re-trigger readiness.
///
/// No timeout or per-load failure path is modeled here; a load that never
/// signals leaves the barrier pending forever. Known gap.
#[derive(Debug)]
pub struct AssetBarrier {
    expected: u32,
    received: u32,
    fired: bool,
}

impl AssetBarrier {
    /// Expect `expected` completion signals. An empty set is immediately ready.
    pub fn new(expected: u32) -> Self {
        Self {
            expected,
            received: 0,
            fired: expected == 0,
        }
    }

    /// Record one load completion.
    pub fn signal(&mut self) -> Result<BarrierState, BarrierError> {
        if self.fired {
            tracing::error!(
                expected = self.expected,
                "duplicate completion signal after barrier fired"
            );
            return Err(BarrierError::ExtraSignal {
                expected: self.expected,
            });
        }

        self.received += 1;
        if self.received == self.expected {
            self.fired = true;
            tracing::info!(expected = self.expected, "all startup loads complete");
            Ok(BarrierState::Ready)
        } else {
            tracing::debug!(
                received = self.received,
                expected = self.expected,
                "load completed"
            );
            Ok(BarrierState::Pending {
                expected: self.expected,
                received: self.received,
            })
        }
    }

    pub fn is_ready(&self) -> bool {
        self.fired
    }

    pub fn received(&self) -> u32 {
        self.received
    }

    pub fn expected(&self) -> u32 {
        self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_on_nth_signal() {
        let mut barrier = AssetBarrier::new(4);
        for i in 1..4 {
            assert_eq!(
                barrier.signal().unwrap(),
                BarrierState::Pending {
                    expected: 4,
                    received: i
                }
            );
            assert!(!barrier.is_ready());
        }
        assert_eq!(barrier.signal().unwrap(), BarrierState::Ready);
        assert!(barrier.is_ready());
    }

    #[test]
    fn extra_signal_is_reported_not_refired() {
        let mut barrier = AssetBarrier::new(2);
        barrier.signal().unwrap();
        assert_eq!(barrier.signal().unwrap(), BarrierState::Ready);

        // N+1th signal is an error, and readiness does not re-trigger.
        let err = barrier.signal();
        assert!(matches!(err, Err(BarrierError::ExtraSignal { expected: 2 })));
        assert!(barrier.is_ready());
        assert_eq!(barrier.received(), 2);
    }

    #[test]
    fn single_load_fires_immediately() {
        let mut barrier = AssetBarrier::new(1);
        assert_eq!(barrier.signal().unwrap(), BarrierState::Ready);
    }

    #[test]
    fn empty_set_is_ready_at_construction() {
        let barrier = AssetBarrier::new(0);
        assert!(barrier.is_ready());
    }
}
