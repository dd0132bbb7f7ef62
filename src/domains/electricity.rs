//! Ohm's law for a single resistor.
//!
//! # Governing Equations
//!
//! ```text
//! I = U / R      P = U·I      E(1 h) = P·3600      Q̇ = I²·R
//! ```
//!
//! The charts sweep the resistance at fixed voltage. The sweep starts at
//! 0.5 Ω so the singularity at `R = 0` is never evaluated.

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::engine::params::ParamSpec;
use crate::engine::sampling::{Grid, Series};
use crate::error::{ensure_finite, require_positive, LabError, LabResult};

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Full-scale current of the ammeter gauge (A).
pub const GAUGE_FULL_SCALE: f64 = 20.0;

/// Reference resistance sweep: `0.5 + (i / 50)·20` Ω for `i in 0..50`.
pub const RESISTANCE_SWEEP: Grid = Grid::new(0.5, 0.4, 50);

/// Circuit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricityParams {
    /// Source voltage (V).
    pub voltage: f64,
    /// Load resistance (Ω).
    pub resistance: f64,
}

impl Default for ElectricityParams {
    fn default() -> Self {
        ElectricitySliders::default().defaults()
    }
}

impl ElectricityParams {
    /// Create parameters.
    #[must_use]
    pub const fn new(voltage: f64, resistance: f64) -> Self {
        Self {
            voltage,
            resistance,
        }
    }

    /// Snap every field to the default slider bounds.
    #[must_use]
    pub fn clamped(&self) -> Self {
        ElectricitySliders::default().clamp(self)
    }

    /// Check the model contract: `U > 0`, `R > 0`.
    ///
    /// # Errors
    ///
    /// Returns [`LabError::InvalidParameter`] for the first field that fails.
    pub fn validate(&self) -> LabResult<()> {
        require_positive("voltage", self.voltage)?;
        require_positive("resistance", self.resistance)?;
        Ok(())
    }
}

/// Slider bounds for the electricity simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ElectricitySliders {
    /// Voltage slider (V).
    #[validate(nested)]
    pub voltage: ParamSpec,
    /// Resistance slider (Ω).
    #[validate(nested)]
    pub resistance: ParamSpec,
}

impl Default for ElectricitySliders {
    fn default() -> Self {
        Self {
            voltage: ParamSpec::new(1.0, 24.0, 0.5, 12.0),
            resistance: ParamSpec::new(0.5, 20.0, 0.5, 6.0),
        }
    }
}

impl ElectricitySliders {
    /// Parameters at mount time.
    #[must_use]
    pub const fn defaults(&self) -> ElectricityParams {
        ElectricityParams::new(self.voltage.default, self.resistance.default)
    }

    /// Clamp parameters to these bounds.
    #[must_use]
    pub fn clamp(&self, params: &ElectricityParams) -> ElectricityParams {
        ElectricityParams::new(
            self.voltage.clamp(params.voltage),
            self.resistance.clamp(params.resistance),
        )
    }

    /// First inconsistency in the slider table, if any.
    #[must_use]
    pub fn check(&self) -> Option<String> {
        if self.resistance.min <= 0.0 {
            return Some("electricity.resistance: min must be positive".to_string());
        }
        [("voltage", &self.voltage), ("resistance", &self.resistance)]
            .iter()
            .find_map(|(name, spec)| spec.check().map(|e| format!("electricity.{name}: {e}")))
    }
}

/// Derived circuit quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricityResults {
    /// Current (A).
    pub current: f64,
    /// Power (W).
    pub power: f64,
    /// Energy delivered in one hour (J).
    pub energy_per_hour: f64,
    /// Joule heating rate I²R (W).
    pub heat_rate: f64,
    /// Ammeter deflection, percent of full scale, capped at 100.
    pub current_gauge_percent: f64,
}

/// Compute derived circuit quantities.
///
/// # Errors
///
/// Returns [`LabError::InvalidParameter`] when `U ≤ 0` or `R ≤ 0`.
pub fn compute_results(params: &ElectricityParams) -> LabResult<ElectricityResults> {
    params.validate()?;
    let current = ensure_finite("electricity.current", params.voltage / params.resistance)?;
    let power = ensure_finite("electricity.power", params.voltage * current)?;

    let results = ElectricityResults {
        current,
        power,
        energy_per_hour: power * SECONDS_PER_HOUR,
        heat_rate: current * current * params.resistance,
        current_gauge_percent: (current / GAUGE_FULL_SCALE * 100.0).min(100.0),
    };
    debug!(?params, ?results, "electricity results computed");
    Ok(results)
}

/// Current and power over a resistance sweep.
///
/// Grid points at or below zero resistance are skipped, so a misconfigured
/// sweep can shorten the series but never divide by zero.
#[must_use]
pub fn compute_series_with(params: &ElectricityParams, sweep: Grid) -> Vec<Series> {
    let voltage = params.voltage;
    let current = move |r: f64| (r > 0.0).then(|| voltage / r);

    let current_series = Series::sample(
        "current_vs_resistance",
        "R (Ω)",
        "I (A)",
        sweep.values(),
        current,
    );
    let power_series = Series::sample(
        "power_vs_resistance",
        "R (Ω)",
        "P (W)",
        sweep.values(),
        |r| current(r).map(|i| voltage * i),
    );
    vec![current_series, power_series]
}

/// Current vs resistance, then power vs resistance, over the reference sweep.
#[must_use]
pub fn compute_series(params: &ElectricityParams) -> Vec<Series> {
    compute_series_with(params, RESISTANCE_SWEEP)
}

/// Ensure a sweep never touches `R ≤ 0`.
///
/// # Errors
///
/// Returns [`LabError::Config`] when the first grid point is not positive.
pub fn check_sweep(sweep: &Grid) -> LabResult<()> {
    if sweep.start > 0.0 && sweep.step > 0.0 {
        Ok(())
    } else {
        Err(LabError::config(format!(
            "resistance sweep must start above 0 Ω with a positive step (start {}, step {})",
            sweep.start, sweep.step
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_reference_circuit() {
        let r = compute_results(&ElectricityParams::new(12.0, 6.0)).expect("valid");
        assert!(close(r.current, 2.0));
        assert!(close(r.power, 24.0));
        assert!(close(r.energy_per_hour, 86_400.0));
        assert!(close(r.heat_rate, r.power));
        assert!(close(r.current_gauge_percent, 10.0));
    }

    #[test]
    fn test_gauge_caps_at_full_scale() {
        let r = compute_results(&ElectricityParams::new(24.0, 0.5)).expect("valid");
        assert!(close(r.current, 48.0));
        assert!(close(r.current_gauge_percent, 100.0));
    }

    #[test]
    fn test_contract_violations() {
        assert!(compute_results(&ElectricityParams::new(12.0, 0.0)).is_err());
        assert!(compute_results(&ElectricityParams::new(0.0, 6.0)).is_err());
        assert!(compute_results(&ElectricityParams::new(12.0, -2.0)).is_err());
        assert!(compute_results(&ElectricityParams::new(f64::INFINITY, 6.0)).is_err());
    }

    #[test]
    fn test_sweep_never_hits_zero() {
        assert!(RESISTANCE_SWEEP.values().all(|r| r >= 0.5));
        assert!(check_sweep(&RESISTANCE_SWEEP).is_ok());
        assert!(check_sweep(&Grid::new(0.0, 0.4, 50)).is_err());
        assert!(check_sweep(&Grid::new(-1.0, 0.4, 50)).is_err());
    }

    #[test]
    fn test_sweep_matches_reference_grid() {
        let g = Grid::fraction_of(0.5, 20.0, 50);
        for i in 0..50 {
            assert!((g.at(i) - RESISTANCE_SWEEP.at(i)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_series_shape() {
        let series = compute_series(&ElectricityParams::default());
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "current_vs_resistance");
        assert_eq!(series[1].name, "power_vs_resistance");
        for s in &series {
            assert_eq!(s.len(), 50);
            assert!(s.is_x_ascending());
            assert!(s.all_finite());
        }
        assert!(close(series[0].points[0].y, 24.0));
        assert!(close(series[1].points[0].y, 288.0));
    }

    #[test]
    fn test_current_strictly_decreasing() {
        let series = compute_series(&ElectricityParams::new(5.0, 3.0));
        assert!(series[0].is_y_strictly_decreasing());
        assert!(series[1].is_y_strictly_decreasing());
    }

    #[test]
    fn test_misconfigured_sweep_skips_singularity() {
        let series = compute_series_with(&ElectricityParams::default(), Grid::new(-1.0, 0.5, 5));
        // -1.0, -0.5, 0.0 dropped; 0.5, 1.0 kept.
        assert_eq!(series[0].len(), 2);
        assert!(series[0].all_finite());
    }

    #[test]
    fn test_clamped() {
        let p = ElectricityParams::new(30.0, 0.1).clamped();
        assert_eq!(p, ElectricityParams::new(24.0, 0.5));
        assert!(ElectricitySliders::default().check().is_none());
    }
}
