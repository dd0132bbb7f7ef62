//! Refraction at a flat interface (Snell's law).
//!
//! # Governing Equations
//!
//! ```text
//! n1·sin θ1 = n2·sin θ2
//! θ2 = asin((n1/n2)·sin θ1)           defined while |(n1/n2)·sin θ1| ≤ 1
//! θc = asin(n2/n1)                    only for n1 > n2
//! v = c / n
//! ```
//!
//! An `asin` argument outside `[-1, 1]` means the ray is totally reflected.
//! That case is reported through [`OpticsResults::total_internal_reflection`]
//! and a `None` refraction angle; NaN never leaves this module.

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::engine::params::ParamSpec;
use crate::engine::sampling::{Grid, Series};
use crate::error::{require_in_range, require_positive, LabResult};

/// Speed of light in vacuum as displayed by the lab (km/s).
pub const SPEED_OF_LIGHT_KM_S: f64 = 300_000.0;

/// Reference incidence sweep: 1° to 90° in 1° steps.
pub const INCIDENCE_SWEEP: Grid = Grid::new(1.0, 1.0, 90);

/// Interface parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticsParams {
    /// Angle of incidence from the normal (degrees).
    pub incidence_angle: f64,
    /// Refractive index of the incident medium.
    pub n1: f64,
    /// Refractive index of the transmitting medium.
    pub n2: f64,
}

impl Default for OpticsParams {
    fn default() -> Self {
        OpticsSliders::default().defaults()
    }
}

impl OpticsParams {
    /// Create parameters.
    #[must_use]
    pub const fn new(incidence_angle: f64, n1: f64, n2: f64) -> Self {
        Self {
            incidence_angle,
            n1,
            n2,
        }
    }

    /// Snap every field to the default slider bounds.
    #[must_use]
    pub fn clamped(&self) -> Self {
        OpticsSliders::default().clamp(self)
    }

    /// Check the model contract: `n1, n2 > 0`, `0 ≤ θ1 ≤ 90`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LabError::InvalidParameter`] for the first field that fails.
    pub fn validate(&self) -> LabResult<()> {
        require_in_range(
            "incidence_angle",
            self.incidence_angle,
            0.0,
            90.0,
            "must lie in [0, 90] degrees",
        )?;
        require_positive("n1", self.n1)?;
        require_positive("n2", self.n2)?;
        Ok(())
    }
}

/// Slider bounds for the optics simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct OpticsSliders {
    /// Incidence angle slider (degrees).
    #[validate(nested)]
    pub incidence_angle: ParamSpec,
    /// Incident medium index slider.
    #[validate(nested)]
    pub n1: ParamSpec,
    /// Transmitting medium index slider.
    #[validate(nested)]
    pub n2: ParamSpec,
}

impl Default for OpticsSliders {
    fn default() -> Self {
        Self {
            incidence_angle: ParamSpec::new(0.0, 89.0, 1.0, 30.0),
            n1: ParamSpec::new(1.0, 2.5, 0.1, 1.0),
            n2: ParamSpec::new(1.0, 2.5, 0.1, 1.5),
        }
    }
}

impl OpticsSliders {
    /// Parameters at mount time.
    #[must_use]
    pub const fn defaults(&self) -> OpticsParams {
        OpticsParams::new(self.incidence_angle.default, self.n1.default, self.n2.default)
    }

    /// Clamp parameters to these bounds.
    #[must_use]
    pub fn clamp(&self, params: &OpticsParams) -> OpticsParams {
        OpticsParams::new(
            self.incidence_angle.clamp(params.incidence_angle),
            self.n1.clamp(params.n1),
            self.n2.clamp(params.n2),
        )
    }

    /// First inconsistency in the slider table, if any.
    #[must_use]
    pub fn check(&self) -> Option<String> {
        if self.n1.min <= 0.0 || self.n2.min <= 0.0 {
            return Some("optics: refractive index sliders must stay positive".to_string());
        }
        if self.incidence_angle.min < 0.0 || self.incidence_angle.max > 90.0 {
            return Some(
                "optics.incidence_angle: bounds must stay within [0, 90] degrees".to_string(),
            );
        }
        [
            ("incidence_angle", &self.incidence_angle),
            ("n1", &self.n1),
            ("n2", &self.n2),
        ]
        .iter()
        .find_map(|(name, spec)| spec.check().map(|e| format!("optics.{name}: {e}")))
    }
}

/// Derived refraction quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpticsResults {
    /// Refraction angle (degrees); `None` under total internal reflection.
    pub refraction_angle: Option<f64>,
    /// Critical angle (degrees); `None` unless `n1 > n2`.
    pub critical_angle: Option<f64>,
    /// True when no refracted ray exists.
    pub total_internal_reflection: bool,
    /// Light speed in the incident medium (km/s).
    pub speed_in_medium1: f64,
    /// Light speed in the transmitting medium (km/s).
    pub speed_in_medium2: f64,
}

/// Rounding slack on the `asin` domain. Incidence exactly at the critical
/// angle must still refract, even when the degree round trip lands a few ulps
/// above 1.
const ASIN_SLACK: f64 = 1e-12;

/// `asin(x)` in degrees, `None` outside the domain.
fn asin_degrees(x: f64) -> Option<f64> {
    if !x.is_finite() || x.abs() > 1.0 + ASIN_SLACK {
        return None;
    }
    Some(x.clamp(-1.0, 1.0).asin().to_degrees())
}

/// Refraction angle in degrees, `None` when the ray cannot refract.
#[must_use]
pub fn refraction_angle(incidence_deg: f64, n1: f64, n2: f64) -> Option<f64> {
    asin_degrees(n1 / n2 * incidence_deg.to_radians().sin())
}

/// Critical angle in degrees, defined only when `n1 > n2`.
#[must_use]
pub fn critical_angle(n1: f64, n2: f64) -> Option<f64> {
    if n1 > n2 {
        asin_degrees(n2 / n1)
    } else {
        None
    }
}

/// Compute derived refraction quantities.
///
/// Total internal reflection holds when `n1 > n2` and the incidence angle is
/// strictly greater than the critical angle, or whenever Snell's law has no
/// real solution.
///
/// # Errors
///
/// Returns [`crate::LabError::InvalidParameter`] for non-positive indices or an
/// incidence angle outside `[0, 90]`.
pub fn compute_results(params: &OpticsParams) -> LabResult<OpticsResults> {
    params.validate()?;
    let OpticsParams {
        incidence_angle,
        n1,
        n2,
    } = *params;

    let critical = critical_angle(n1, n2);
    let beyond_critical = critical.is_some_and(|c| incidence_angle > c);
    let refracted = refraction_angle(incidence_angle, n1, n2);
    let total_internal_reflection = beyond_critical || refracted.is_none();

    let results = OpticsResults {
        refraction_angle: if total_internal_reflection {
            None
        } else {
            refracted
        },
        critical_angle: critical,
        total_internal_reflection,
        speed_in_medium1: SPEED_OF_LIGHT_KM_S / n1,
        speed_in_medium2: SPEED_OF_LIGHT_KM_S / n2,
    };
    debug!(?params, ?results, "optics results computed");
    Ok(results)
}

/// Refraction angle vs incidence angle over `sweep`; points without a
/// refracted ray are dropped.
#[must_use]
pub fn refraction_series_with(params: &OpticsParams, sweep: Grid) -> Series {
    let OpticsParams { n1, n2, .. } = *params;
    Series::sample(
        "refraction_vs_incidence",
        "θ1 (°)",
        "θ2 (°)",
        sweep.values(),
        |theta1| refraction_angle(theta1, n1, n2),
    )
}

/// Refraction angle vs incidence angle, 1° to 90°.
#[must_use]
pub fn refraction_series(params: &OpticsParams) -> Series {
    refraction_series_with(params, INCIDENCE_SWEEP)
}

/// All optics charts.
#[must_use]
pub fn compute_series(params: &OpticsParams) -> Vec<Series> {
    vec![refraction_series(params)]
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_no_reflection_into_denser_medium(
            angle in 0.0f64..=89.0,
            n1 in 1.0f64..2.5,
            extra in 0.0f64..1.0,
        ) {
            let r = compute_results(&OpticsParams::new(angle, n1, n1 + extra)).expect("valid");
            prop_assert!(!r.total_internal_reflection);
            prop_assert!(r.refraction_angle.is_some());
        }

        #[test]
        fn prop_reflection_iff_beyond_critical(
            angle in 0.0f64..=89.0,
            n2 in 1.0f64..2.0,
            extra in 0.05f64..1.0,
        ) {
            let n1 = n2 + extra;
            let r = compute_results(&OpticsParams::new(angle, n1, n2)).expect("valid");
            let critical = r.critical_angle.expect("n1 > n2");
            prop_assert_eq!(r.total_internal_reflection, angle > critical);
            prop_assert_eq!(r.refraction_angle.is_none(), r.total_internal_reflection);
        }

        #[test]
        fn prop_snell_holds(angle in 0.0f64..=89.0, n1 in 1.0f64..2.5, n2 in 1.0f64..2.5) {
            let r = compute_results(&OpticsParams::new(angle, n1, n2)).expect("valid");
            if let Some(theta2) = r.refraction_angle {
                let lhs = n1 * angle.to_radians().sin();
                let rhs = n2 * theta2.to_radians().sin();
                prop_assert!((lhs - rhs).abs() < 1e-9);
            }
        }

        #[test]
        fn prop_series_never_contains_nan(n1 in 1.0f64..2.5, n2 in 1.0f64..2.5) {
            let s = refraction_series(&OpticsParams::new(30.0, n1, n2));
            prop_assert!(s.all_finite());
            prop_assert!(s.is_x_ascending());
        }
    }
}
