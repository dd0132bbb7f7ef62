//! Projectile motion.
//!
//! A point mass launched from ground level with speed `v` at angle `θ` above
//! the horizontal, no drag.
//!
//! # Governing Equations
//!
//! ```text
//! vx = v·cos θ          vy = v·sin θ
//! h(t) = vy·t − ½g·t²   x(t) = vx·t
//! |v(t)| = sqrt(vx² + (vy − g·t)²)
//! H = vy² / 2g          R = v²·sin 2θ / g      T = 2·vy / g
//! Ek = ½·m·v²
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::engine::params::ParamSpec;
use crate::engine::sampling::{Grid, Series};
use crate::error::{ensure_finite, require_in_range, require_positive, LabError, LabResult};

/// Standard gravity (m/s²).
pub const G: f64 = 9.81;

/// Samples per time series.
pub const TIME_SAMPLES: usize = 100;

/// Projectile launch parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MechanicsParams {
    /// Mass (kg).
    pub mass: f64,
    /// Launch speed (m/s).
    pub velocity: f64,
    /// Launch angle above horizontal (degrees).
    pub angle: f64,
}

impl Default for MechanicsParams {
    fn default() -> Self {
        MechanicsSliders::default().defaults()
    }
}

impl MechanicsParams {
    /// Create parameters.
    #[must_use]
    pub const fn new(mass: f64, velocity: f64, angle: f64) -> Self {
        Self {
            mass,
            velocity,
            angle,
        }
    }

    /// Snap every field to the default slider bounds.
    #[must_use]
    pub fn clamped(&self) -> Self {
        MechanicsSliders::default().clamp(self)
    }

    /// Check the model contract: `m > 0`, `v ≥ 0`, `0 ≤ θ ≤ 90`.
    ///
    /// # Errors
    ///
    /// Returns [`LabError::InvalidParameter`] for the first field that fails.
    pub fn validate(&self) -> LabResult<()> {
        require_positive("mass", self.mass)?;
        if !self.velocity.is_finite() || self.velocity < 0.0 {
            return Err(LabError::invalid(
                "velocity",
                self.velocity,
                "must be finite and non-negative",
            ));
        }
        require_in_range("angle", self.angle, 0.0, 90.0, "must lie in [0, 90] degrees")?;
        Ok(())
    }

    /// Closed-form trajectory for these launch conditions.
    #[must_use]
    pub fn trajectory(&self) -> Trajectory {
        Trajectory::launch(self.velocity, self.angle)
    }
}

/// Slider bounds for the mechanics simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct MechanicsSliders {
    /// Mass slider (kg).
    #[validate(nested)]
    pub mass: ParamSpec,
    /// Speed slider (m/s).
    #[validate(nested)]
    pub velocity: ParamSpec,
    /// Angle slider (degrees).
    #[validate(nested)]
    pub angle: ParamSpec,
}

impl Default for MechanicsSliders {
    fn default() -> Self {
        Self {
            mass: ParamSpec::new(1.0, 20.0, 0.5, 5.0),
            velocity: ParamSpec::new(1.0, 30.0, 1.0, 10.0),
            angle: ParamSpec::new(0.0, 90.0, 5.0, 45.0),
        }
    }
}

impl MechanicsSliders {
    /// Parameters at mount time.
    #[must_use]
    pub const fn defaults(&self) -> MechanicsParams {
        MechanicsParams::new(self.mass.default, self.velocity.default, self.angle.default)
    }

    /// Clamp parameters to these bounds.
    #[must_use]
    pub fn clamp(&self, params: &MechanicsParams) -> MechanicsParams {
        MechanicsParams::new(
            self.mass.clamp(params.mass),
            self.velocity.clamp(params.velocity),
            self.angle.clamp(params.angle),
        )
    }

    /// First inconsistency in the slider table, if any.
    #[must_use]
    pub fn check(&self) -> Option<String> {
        if self.mass.min <= 0.0 {
            return Some("mechanics.mass: min must be positive".to_string());
        }
        if self.velocity.min < 0.0 {
            return Some("mechanics.velocity: min must not be negative".to_string());
        }
        if self.angle.min < 0.0 || self.angle.max > 90.0 {
            return Some("mechanics.angle: bounds must stay within [0, 90] degrees".to_string());
        }
        [("mass", &self.mass), ("velocity", &self.velocity), ("angle", &self.angle)]
            .iter()
            .find_map(|(name, spec)| spec.check().map(|e| format!("mechanics.{name}: {e}")))
    }
}

/// Closed-form ballistic trajectory from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Horizontal velocity component (m/s).
    pub vx: f64,
    /// Initial vertical velocity component (m/s).
    pub vy: f64,
    /// Gravitational acceleration (m/s²).
    pub g: f64,
}

impl Trajectory {
    /// Launch with `speed` at `angle_deg` above horizontal under standard gravity.
    #[must_use]
    pub fn launch(speed: f64, angle_deg: f64) -> Self {
        let theta = angle_deg.to_radians();
        Self {
            vx: speed * theta.cos(),
            vy: speed * theta.sin(),
            g: G,
        }
    }

    /// Height above ground at time `t`.
    #[must_use]
    pub fn height_at(&self, t: f64) -> f64 {
        self.vy.mul_add(t, -0.5 * self.g * t * t)
    }

    /// Horizontal distance at time `t`.
    #[must_use]
    pub fn x_at(&self, t: f64) -> f64 {
        self.vx * t
    }

    /// `(x, h)` at time `t`.
    #[must_use]
    pub fn position_at(&self, t: f64) -> (f64, f64) {
        (self.x_at(t), self.height_at(t))
    }

    /// Speed magnitude at time `t`.
    #[must_use]
    pub fn speed_at(&self, t: f64) -> f64 {
        let vy_t = self.g.mul_add(-t, self.vy);
        self.vx.hypot(vy_t)
    }

    /// Time until the projectile returns to ground level.
    #[must_use]
    pub fn flight_time(&self) -> f64 {
        2.0 * self.vy / self.g
    }

    /// Apex height.
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.vy * self.vy / (2.0 * self.g)
    }

    /// Horizontal distance at landing, never negative.
    ///
    /// `2·vx·vy/g` equals `v²·sin 2θ / g`.
    #[must_use]
    pub fn range(&self) -> f64 {
        (2.0 * self.vx * self.vy / self.g).max(0.0)
    }
}

/// Derived projectile quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MechanicsResults {
    /// Horizontal velocity component (m/s).
    pub vx: f64,
    /// Initial vertical velocity component (m/s).
    pub vy: f64,
    /// Apex height (m).
    pub max_height: f64,
    /// Landing distance (m).
    pub range: f64,
    /// Time of flight (s).
    pub flight_time: f64,
    /// Kinetic energy at launch (J).
    pub kinetic_energy: f64,
}

/// Compute derived projectile quantities.
///
/// # Errors
///
/// Returns [`LabError::InvalidParameter`] when `params` violates the contract.
pub fn compute_results(params: &MechanicsParams) -> LabResult<MechanicsResults> {
    params.validate()?;
    let trajectory = params.trajectory();

    let results = MechanicsResults {
        vx: ensure_finite("mechanics.vx", trajectory.vx)?,
        vy: ensure_finite("mechanics.vy", trajectory.vy)?,
        max_height: ensure_finite("mechanics.max_height", trajectory.max_height())?,
        range: ensure_finite("mechanics.range", trajectory.range())?,
        flight_time: ensure_finite("mechanics.flight_time", trajectory.flight_time())?,
        kinetic_energy: ensure_finite(
            "mechanics.kinetic_energy",
            0.5 * params.mass * params.velocity * params.velocity,
        )?,
    };
    debug!(?params, ?results, "mechanics results computed");
    Ok(results)
}

/// Sample times `t_i = (i / samples)·T`. A zero (or invalid) flight time
/// yields the single sample `t = 0`.
fn time_grid(flight_time: f64, samples: usize) -> Grid {
    if flight_time > 0.0 && flight_time.is_finite() && samples > 0 {
        Grid::fraction_of(0.0, flight_time, samples)
    } else {
        Grid::new(0.0, 0.0, 1)
    }
}

/// Height over the flight, `samples` points.
#[must_use]
pub fn height_series_with(params: &MechanicsParams, samples: usize) -> Series {
    let trajectory = params.trajectory();
    Series::sample(
        "height_vs_time",
        "t (s)",
        "h (m)",
        time_grid(trajectory.flight_time(), samples).values(),
        |t| Some(trajectory.height_at(t)),
    )
}

/// Speed over the flight, `samples` points.
#[must_use]
pub fn speed_series_with(params: &MechanicsParams, samples: usize) -> Series {
    let trajectory = params.trajectory();
    Series::sample(
        "speed_vs_time",
        "t (s)",
        "v (m/s)",
        time_grid(trajectory.flight_time(), samples).values(),
        |t| Some(trajectory.speed_at(t)),
    )
}

/// Height vs time at the reference resolution.
#[must_use]
pub fn height_series(params: &MechanicsParams) -> Series {
    height_series_with(params, TIME_SAMPLES)
}

/// Speed vs time at the reference resolution.
#[must_use]
pub fn speed_series(params: &MechanicsParams) -> Series {
    speed_series_with(params, TIME_SAMPLES)
}

/// All mechanics charts: height vs time, then speed vs time.
#[must_use]
pub fn compute_series(params: &MechanicsParams) -> Vec<Series> {
    vec![height_series(params), speed_series(params)]
}
