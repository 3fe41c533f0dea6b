use std::time::{Duration, Instant};

/// Fixed-rate gate for simulation ticks.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    interval: Duration,
    last_tick: Instant,
}

impl TickClock {
    /// Creates a clock firing `hz` times per second, starting now.
    ///
    /// A rate of zero is treated as one tick per second.
    #[must_use]
    pub fn from_rate(hz: u32) -> Self {
        Self::starting_at(hz, Instant::now())
    }

    #[must_use]
    pub fn starting_at(hz: u32, start: Instant) -> Self {
        Self {
            interval: Duration::from_secs(1) / hz.max(1),
            last_tick: start,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true once per elapsed interval and re-arms the clock.
    pub fn tick_due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) < self.interval {
            return false;
        }

        self.last_tick = now;
        true
    }

    /// Time left until the next tick is due.
    #[must_use]
    pub fn until_next(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }
}
