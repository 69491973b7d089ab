//! Simulated response latency for the local resolver.
//!
//! The local resolver waits before answering to feel like a network round
//! trip. The delay source is injected so tests can pin it to a fixed value.

use std::time::Duration;

use rand::Rng;

/// Source of simulated response delays.
pub trait LatencyModel: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// Uniformly random delay within `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct RandomLatency {
    min: Duration,
    max: Duration,
}

impl RandomLatency {
    /// Bounds are reordered if given backwards.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }
}

impl Default for RandomLatency {
    fn default() -> Self {
        Self::new(Duration::from_millis(200), Duration::from_millis(2_000))
    }
}

impl LatencyModel for RandomLatency {
    fn next_delay(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// The same delay every time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLatency(pub Duration);

impl FixedLatency {
    pub fn none() -> Self {
        Self(Duration::ZERO)
    }
}

impl LatencyModel for FixedLatency {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_latency_stays_in_bounds() {
        let latency = RandomLatency::new(Duration::from_millis(10), Duration::from_millis(20));
        for _ in 0..200 {
            let delay = latency.next_delay();
            assert!(delay >= Duration::from_millis(10));
            assert!(delay <= Duration::from_millis(20));
        }
    }

    #[test]
    fn test_random_latency_reorders_bounds() {
        let latency = RandomLatency::new(Duration::from_millis(50), Duration::from_millis(5));
        assert_eq!(
            latency.bounds(),
            (Duration::from_millis(5), Duration::from_millis(50))
        );
    }

    #[test]
    fn test_random_latency_degenerate_range() {
        let latency = RandomLatency::new(Duration::from_millis(7), Duration::from_millis(7));
        assert_eq!(latency.next_delay(), Duration::from_millis(7));
    }

    #[test]
    fn test_fixed_latency() {
        assert_eq!(FixedLatency::none().next_delay(), Duration::ZERO);
        assert_eq!(
            FixedLatency(Duration::from_millis(3)).next_delay(),
            Duration::from_millis(3)
        );
    }
}
