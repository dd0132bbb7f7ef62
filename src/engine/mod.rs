//! Shared simulation machinery.
//!
//! - Slider bounds and step snapping ([`params`])
//! - Parametric sampling of chart series ([`sampling`])
//! - Fixed-interval clock and the projectile animation ([`clock`], [`animation`])
//! - The [`Simulator`] trait every domain implements

pub mod animation;
pub mod clock;
pub mod params;
pub mod sampling;

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use animation::{
    transition, AnimationEvent, AnimationFrame, AnimationState, ProjectileAnimation,
    ScreenProjection, StopReason,
};
pub use clock::AnimationClock;
pub use params::ParamSpec;
pub use sampling::{Grid, Series, SeriesPoint};

use crate::error::LabResult;

/// Simulation time.
///
/// Fixed-point nanoseconds so repeated 50 ms ticks land on exact values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SimTime {
    /// Nanoseconds from launch.
    nanos: u64,
}

impl SimTime {
    /// Time zero.
    pub const ZERO: Self = Self { nanos: 0 };

    /// Create time from seconds, rounded to the nearest nanosecond.
    ///
    /// Negative, NaN or infinite input gives [`SimTime::ZERO`]; values past
    /// the `u64` range saturate.
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nanos = (secs * 1_000_000_000.0).round() as u64;
        Self { nanos }
    }

    /// Create time from nanoseconds.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Time as seconds.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Time as nanoseconds.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Add a duration, saturating at `u64::MAX`.
    #[must_use]
    pub const fn add_nanos(self, nanos: u64) -> Self {
        Self {
            nanos: self.nanos.saturating_add(nanos),
        }
    }
}

impl std::ops::Add for SimTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add_nanos(rhs.nanos)
    }
}

impl std::ops::Sub for SimTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            nanos: self.nanos.saturating_sub(rhs.nanos),
        }
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

/// A stateless physics model: parameters in, readouts and charts out.
///
/// Implementors are unit types; everything is an associated function so a
/// front end can be generic over domains without holding an instance.
pub trait Simulator {
    /// Input record.
    type Params: Copy + Default + Debug + Serialize + DeserializeOwned;
    /// Derived scalar readouts.
    type Results: Debug + Serialize;

    /// Identifier used on the command line and in config files.
    const NAME: &'static str;

    /// Derived scalar results.
    ///
    /// # Errors
    ///
    /// Returns an error only for contractually invalid parameters.
    fn compute_results(params: &Self::Params) -> LabResult<Self::Results>;

    /// Chart series, each finite and ascending in `x`.
    fn compute_series(params: &Self::Params) -> Vec<Series>;

    /// Snap parameters to the default slider bounds.
    fn clamp(params: &Self::Params) -> Self::Params;
}
