//! Slider bounds for simulator parameters.
//!
//! Every parameter the input layer exposes has a declared range, step and
//! default. [`ParamSpec::clamp`] turns arbitrary input into a value the
//! model functions accept.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Range, step and default of one slider-controlled parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ParamSpec {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
    /// Step granularity.
    #[validate(range(exclusive_min = 0.0))]
    pub step: f64,
    /// Value at mount time.
    pub default: f64,
}

impl ParamSpec {
    /// Create a new spec.
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            min,
            max,
            step,
            default,
        }
    }

    /// Clamp `value` into `[min, max]` at step granularity.
    ///
    /// Non-finite input falls back to the default. Snapping is relative to
    /// `min`, and the snapped value is clamped again so it never exceeds `max`
    /// when `max` is not on the step grid.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let bounded = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return bounded;
        }
        let steps = ((bounded - self.min) / self.step).round();
        let snapped = steps.mul_add(self.step, self.min);
        // Strip float residue such as 0.30000000000000004.
        let snapped = (snapped * 1e9).round() / 1e9;
        snapped.clamp(self.min, self.max)
    }

    /// True if `value` lies inside the declared range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check internal consistency: ordered bounds, positive step, default in range.
    ///
    /// Returns a description of the first problem found.
    #[must_use]
    pub fn check(&self) -> Option<String> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Some("bounds and step must be finite".to_string());
        }
        if self.min >= self.max {
            return Some(format!("min {} must be below max {}", self.min, self.max));
        }
        if self.step <= 0.0 {
            return Some(format!("step {} must be positive", self.step));
        }
        if !self.contains(self.default) {
            return Some(format!(
                "default {} outside [{}, {}]",
                self.default, self.min, self.max
            ));
        }
        None
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_clamp_stays_in_range(value in -1e6f64..1e6) {
            let spec = ParamSpec::new(0.5, 20.0, 0.5, 6.0);
            let clamped = spec.clamp(value);
            prop_assert!(spec.contains(clamped));
        }

        #[test]
        fn prop_clamp_is_idempotent(value in -100.0f64..300.0) {
            let spec = ParamSpec::new(10.0, 200.0, 5.0, 100.0);
            let once = spec.clamp(value);
            prop_assert!((spec.clamp(once) - once).abs() < 1e-9);
        }

        #[test]
        fn prop_clamp_lands_on_grid(value in 0.0f64..90.0) {
            let spec = ParamSpec::new(0.0, 90.0, 5.0, 45.0);
            let clamped = spec.clamp(value);
            let k = clamped / 5.0;
            prop_assert!((k - k.round()).abs() < 1e-9);
        }
    }
}
