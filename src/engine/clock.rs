//! Animation clock.
//!
//! Supplies the fixed-interval tick that drives the projectile animation.
//! The clock only counts; whoever owns the scheduling primitive (a UI timer,
//! a terminal loop, a test) calls [`AnimationClock::tick`] and feeds the
//! resulting time step into the animation state machine.

use serde::{Deserialize, Serialize};

use crate::engine::SimTime;

/// Reference tick interval of the animation loop (50 ms).
pub const DEFAULT_TICK_NANOS: u64 = 50_000_000;

/// Fixed-interval clock for the animation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationClock {
    /// Simulated time elapsed since the last reset.
    current: SimTime,
    /// Timestep duration in nanoseconds.
    timestep_nanos: u64,
    /// Number of ticks taken.
    tick_count: u64,
    /// Optional cap on the number of ticks.
    max_ticks: Option<u64>,
}

impl AnimationClock {
    /// Create a clock with the given timestep in seconds.
    ///
    /// Non-positive or non-finite timesteps fall back to the 50 ms default.
    #[must_use]
    pub fn new(timestep_secs: f64) -> Self {
        let timestep = SimTime::from_secs(timestep_secs);
        if timestep == SimTime::ZERO {
            return Self::default();
        }
        Self::from_nanos(timestep.as_nanos())
    }

    /// Create a clock with timestep in nanoseconds.
    #[must_use]
    pub const fn from_nanos(timestep_nanos: u64) -> Self {
        Self {
            current: SimTime::ZERO,
            timestep_nanos,
            tick_count: 0,
            max_ticks: None,
        }
    }

    /// Current simulated time.
    #[must_use]
    pub const fn current_time(&self) -> SimTime {
        self.current
    }

    /// Timestep duration.
    #[must_use]
    pub const fn timestep(&self) -> SimTime {
        SimTime::from_nanos(self.timestep_nanos)
    }

    /// Number of ticks taken.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Cap the number of ticks (a safety net for headless runs).
    #[allow(clippy::missing_const_for_fn)]
    pub fn set_max_ticks(&mut self, max: u64) {
        self.max_ticks = Some(max);
    }

    /// True once the tick cap has been reached.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.max_ticks.is_some_and(|max| self.tick_count >= max)
    }

    /// Advance by one timestep and return the new time.
    #[allow(clippy::missing_const_for_fn)]
    pub fn tick(&mut self) -> SimTime {
        self.current = self.current.add_nanos(self.timestep_nanos);
        self.tick_count += 1;
        self.current
    }

    /// Reset to time zero.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reset(&mut self) {
        self.current = SimTime::ZERO;
        self.tick_count = 0;
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::from_nanos(DEFAULT_TICK_NANOS)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_tick_count_accurate(ticks in 0u64..500) {
            let mut clock = AnimationClock::default();
            for _ in 0..ticks {
                clock.tick();
            }
            prop_assert_eq!(clock.tick_count(), ticks);
            prop_assert_eq!(clock.current_time().as_nanos(), ticks * DEFAULT_TICK_NANOS);
        }
    }
}
