//! Ideal gas in a piston.
//!
//! # Governing Equations
//!
//! ```text
//! P·V = n·R·T          (P in kPa, V in L: kPa·L = J, so no scale factor)
//! N = n·N_A
//! isothermal: P(V) = P0·V0 / V
//! isobaric:   T(V) = P0·V / (n·R)
//! isochoric:  T(P) = P·V0 / (n·R)
//! ```
//!
//! The process type only selects which curve is sampled. Each curve passes
//! through the current state `(P0, V0, T0)`, so switching the process type
//! never moves the operating point.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::engine::params::ParamSpec;
use crate::engine::sampling::{Grid, Series, SeriesPoint};
use crate::error::{ensure_finite, require_positive, LabError, LabResult};

/// Molar gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;

/// Avogadro constant, 1/mol.
pub const AVOGADRO: f64 = 6.022e23;

/// Kelvin-to-Celsius offset used by the lab readout.
pub const CELSIUS_OFFSET: f64 = 273.0;

/// Upper bound on the cosmetic molecule dots drawn in the piston.
pub const MAX_PARTICLES: u32 = 50;

/// Reference volume sweep: 2 L to 20 L in 0.5 L steps.
pub const VOLUME_SWEEP: Grid = Grid::new(2.0, 0.5, 37);

/// Reference pressure sweep: 10 kPa to 200 kPa in 5 kPa steps.
pub const PRESSURE_SWEEP: Grid = Grid::new(10.0, 5.0, 39);

/// Which state variable the process holds constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessType {
    /// Constant temperature (`PV = const`).
    #[default]
    Isothermal,
    /// Constant pressure (`V/T = const`).
    Isobaric,
    /// Constant volume (`P/T = const`).
    Isochoric,
}

impl ProcessType {
    /// All process types, in display order.
    pub const ALL: [Self; 3] = [Self::Isothermal, Self::Isobaric, Self::Isochoric];

    /// Lower-case identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Isothermal => "isothermal",
            Self::Isobaric => "isobaric",
            Self::Isochoric => "isochoric",
        }
    }

    /// The invariant the process preserves.
    #[must_use]
    pub const fn invariant(self) -> &'static str {
        match self {
            Self::Isothermal => "PV = const",
            Self::Isobaric => "V/T = const",
            Self::Isochoric => "P/T = const",
        }
    }
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessType {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "isothermal" | "t" => Ok(Self::Isothermal),
            "isobaric" | "p" => Ok(Self::Isobaric),
            "isochoric" | "v" => Ok(Self::Isochoric),
            other => Err(LabError::config(format!(
                "unknown process type '{other}' (expected isothermal, isobaric or isochoric)"
            ))),
        }
    }
}

/// Gas state and selected process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermodynamicsParams {
    /// Pressure (kPa).
    pub pressure: f64,
    /// Volume (L).
    pub volume: f64,
    /// Temperature (K).
    pub temperature: f64,
    /// Process used for the chart.
    #[serde(default)]
    pub process: ProcessType,
}

impl Default for ThermodynamicsParams {
    fn default() -> Self {
        ThermodynamicsSliders::default().defaults()
    }
}

impl ThermodynamicsParams {
    /// Create parameters.
    #[must_use]
    pub const fn new(pressure: f64, volume: f64, temperature: f64, process: ProcessType) -> Self {
        Self {
            pressure,
            volume,
            temperature,
            process,
        }
    }

    /// Same state, different process.
    #[must_use]
    pub const fn with_process(self, process: ProcessType) -> Self {
        Self { process, ..self }
    }

    /// Snap every field to the default slider bounds.
    #[must_use]
    pub fn clamped(&self) -> Self {
        ThermodynamicsSliders::default().clamp(self)
    }

    /// Check the model contract: `P, V, T > 0`.
    ///
    /// # Errors
    ///
    /// Returns [`LabError::InvalidParameter`] for the first field that fails.
    pub fn validate(&self) -> LabResult<()> {
        require_positive("pressure", self.pressure)?;
        require_positive("volume", self.volume)?;
        require_positive("temperature", self.temperature)?;
        Ok(())
    }

    /// Amount of gas, `n = PV / RT` (mol).
    #[must_use]
    pub fn molar_amount(&self) -> f64 {
        self.pressure * self.volume / (GAS_CONSTANT * self.temperature)
    }
}

/// Slider bounds for the thermodynamics simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ThermodynamicsSliders {
    /// Pressure slider (kPa).
    #[validate(nested)]
    pub pressure: ParamSpec,
    /// Volume slider (L).
    #[validate(nested)]
    pub volume: ParamSpec,
    /// Temperature slider (K).
    #[validate(nested)]
    pub temperature: ParamSpec,
    /// Process selected at mount time.
    pub process: ProcessType,
}

impl Default for ThermodynamicsSliders {
    fn default() -> Self {
        Self {
            pressure: ParamSpec::new(10.0, 200.0, 5.0, 100.0),
            volume: ParamSpec::new(2.0, 20.0, 1.0, 10.0),
            temperature: ParamSpec::new(100.0, 600.0, 10.0, 300.0),
            process: ProcessType::Isothermal,
        }
    }
}

impl ThermodynamicsSliders {
    /// Parameters at mount time.
    #[must_use]
    pub const fn defaults(&self) -> ThermodynamicsParams {
        ThermodynamicsParams::new(
            self.pressure.default,
            self.volume.default,
            self.temperature.default,
            self.process,
        )
    }

    /// Clamp parameters to these bounds; the process type passes through.
    #[must_use]
    pub fn clamp(&self, params: &ThermodynamicsParams) -> ThermodynamicsParams {
        ThermodynamicsParams::new(
            self.pressure.clamp(params.pressure),
            self.volume.clamp(params.volume),
            self.temperature.clamp(params.temperature),
            params.process,
        )
    }

    /// First inconsistency in the slider table, if any.
    #[must_use]
    pub fn check(&self) -> Option<String> {
        if self.pressure.min <= 0.0 || self.volume.min <= 0.0 || self.temperature.min <= 0.0 {
            return Some("thermodynamics: P, V and T sliders must stay positive".to_string());
        }
        [
            ("pressure", &self.pressure),
            ("volume", &self.volume),
            ("temperature", &self.temperature),
        ]
        .iter()
        .find_map(|(name, spec)| spec.check().map(|e| format!("thermodynamics.{name}: {e}")))
    }
}

/// Derived gas quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermodynamicsResults {
    /// Amount of substance (mol).
    pub molar_amount: f64,
    /// P·V product (kPa·L).
    pub pv_product: f64,
    /// Number of molecules (display estimate).
    pub molecule_count: f64,
    /// Temperature in degrees Celsius.
    pub temperature_celsius: f64,
    /// Molecule dots the piston view draws.
    pub particle_count: u32,
    /// Process the chart follows.
    pub process: ProcessType,
}

/// Molecule dots for the piston view: `min(⌊(P/10)·(T/300)⌋, 50)`.
///
/// Only the count is physics-driven; dot positions belong to the renderer.
#[must_use]
pub fn particle_count(pressure: f64, temperature: f64) -> u32 {
    let raw = (pressure / 10.0) * (temperature / 300.0);
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    (raw.floor() as u32).min(MAX_PARTICLES)
}

/// Compute derived gas quantities.
///
/// # Errors
///
/// Returns [`LabError::InvalidParameter`] when `P`, `V` or `T` is not positive.
pub fn compute_results(params: &ThermodynamicsParams) -> LabResult<ThermodynamicsResults> {
    params.validate()?;
    let molar_amount = ensure_finite("thermodynamics.molar_amount", params.molar_amount())?;

    let results = ThermodynamicsResults {
        molar_amount,
        pv_product: params.pressure * params.volume,
        molecule_count: molar_amount * AVOGADRO,
        temperature_celsius: params.temperature - CELSIUS_OFFSET,
        particle_count: particle_count(params.pressure, params.temperature),
        process: params.process,
    };
    debug!(?params, ?results, "thermodynamics results computed");
    Ok(results)
}

/// One state on a process curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatePoint {
    /// Volume (L).
    pub volume: f64,
    /// Pressure (kPa).
    pub pressure: f64,
    /// Temperature (K).
    pub temperature: f64,
}

impl StatePoint {
    fn is_finite(&self) -> bool {
        self.volume.is_finite() && self.pressure.is_finite() && self.temperature.is_finite()
    }
}

/// Sweep grids for the process curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessSampling {
    /// Volume sweep for isothermal and isobaric curves (L).
    #[validate(nested)]
    pub volume: Grid,
    /// Pressure sweep for isochoric curves (kPa).
    #[validate(nested)]
    pub pressure: Grid,
}

impl Default for ProcessSampling {
    fn default() -> Self {
        Self {
            volume: VOLUME_SWEEP,
            pressure: PRESSURE_SWEEP,
        }
    }
}

/// Full `(V, P, T)` states along the selected process.
///
/// Non-physical sweep points (non-positive volume or pressure) and any state
/// that fails to come out finite are skipped. The current state is always on
/// the path: it replaces the sweep point at the same abscissa, or is inserted
/// in order when the sweep steps over it.
#[must_use]
pub fn process_path_with(params: &ThermodynamicsParams, sampling: &ProcessSampling) -> Vec<StatePoint> {
    let ThermodynamicsParams {
        pressure: p0,
        volume: v0,
        temperature: t0,
        process,
    } = *params;
    let nr = params.molar_amount() * GAS_CONSTANT;

    let states: Box<dyn Iterator<Item = StatePoint>> = match process {
        ProcessType::Isothermal => Box::new(sampling.volume.values().map(move |v| StatePoint {
            volume: v,
            pressure: p0 * v0 / v,
            temperature: t0,
        })),
        ProcessType::Isobaric => Box::new(sampling.volume.values().map(move |v| StatePoint {
            volume: v,
            pressure: p0,
            temperature: p0 * v / nr,
        })),
        ProcessType::Isochoric => Box::new(sampling.pressure.values().map(move |p| StatePoint {
            volume: v0,
            pressure: p,
            temperature: p * v0 / nr,
        })),
    };

    let physical = |s: &StatePoint| s.volume > 0.0 && s.pressure > 0.0 && s.is_finite();
    let mut path: Vec<StatePoint> = states.filter(physical).collect();

    let current = StatePoint {
        volume: v0,
        pressure: p0,
        temperature: t0,
    };
    if physical(&current) {
        let abscissa = move |s: &StatePoint| match process {
            ProcessType::Isothermal | ProcessType::Isobaric => s.volume,
            ProcessType::Isochoric => s.pressure,
        };
        let x0 = abscissa(&current);
        let tolerance = 1e-9 * x0.abs().max(1.0);
        let idx = path.partition_point(|s| abscissa(s) < x0);
        let same_x = [idx.checked_sub(1), Some(idx)]
            .into_iter()
            .flatten()
            .find(|&i| path.get(i).is_some_and(|s| (abscissa(s) - x0).abs() <= tolerance));
        match same_x {
            Some(i) => path[i] = current,
            None => path.insert(idx, current),
        }
    }
    path
}

/// Full `(V, P, T)` states along the selected process on the reference grids.
#[must_use]
pub fn process_path(params: &ThermodynamicsParams) -> Vec<StatePoint> {
    process_path_with(params, &ProcessSampling::default())
}

/// The chart for the selected process:
/// isothermal P vs V, isobaric T vs V, isochoric T vs P.
#[must_use]
pub fn process_series_with(params: &ThermodynamicsParams, sampling: &ProcessSampling) -> Series {
    let process = params.process;
    let (name, x_label, y_label) = match process {
        ProcessType::Isothermal => ("pressure_vs_volume", "V (L)", "P (kPa)"),
        ProcessType::Isobaric => ("temperature_vs_volume", "V (L)", "T (K)"),
        ProcessType::Isochoric => ("temperature_vs_pressure", "P (kPa)", "T (K)"),
    };

    let mut series = Series::new(name, x_label, y_label);
    series.points = process_path_with(params, sampling)
        .iter()
        .map(|s| match process {
            ProcessType::Isothermal => SeriesPoint::new(s.volume, s.pressure),
            ProcessType::Isobaric => SeriesPoint::new(s.volume, s.temperature),
            ProcessType::Isochoric => SeriesPoint::new(s.pressure, s.temperature),
        })
        .collect();
    series
}

/// The chart for the selected process on the reference grids.
#[must_use]
pub fn process_series(params: &ThermodynamicsParams) -> Series {
    process_series_with(params, &ProcessSampling::default())
}

/// All thermodynamics charts.
#[must_use]
pub fn compute_series(params: &ThermodynamicsParams) -> Vec<Series> {
    vec![process_series(params)]
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn process() -> impl Strategy<Value = ProcessType> {
        prop_oneof![
            Just(ProcessType::Isothermal),
            Just(ProcessType::Isobaric),
            Just(ProcessType::Isochoric),
        ]
    }

    proptest! {
        #[test]
        fn prop_operating_point_on_every_curve(
            p_step in 0usize..39,
            v_step in 0usize..19,
            t_step in 0usize..51,
            process in process(),
        ) {
            let params = ThermodynamicsParams::new(
                10.0 + 5.0 * p_step as f64,
                2.0 + v_step as f64,
                100.0 + 10.0 * t_step as f64,
                process,
            );
            let hit = process_path(&params).iter().any(|s| {
                (s.volume - params.volume).abs() < 1e-9
                    && (s.pressure - params.pressure).abs() < 1e-9
                    && (s.temperature - params.temperature).abs() < 1e-6
            });
            prop_assert!(hit);
        }

        #[test]
        fn prop_every_state_obeys_gas_law(
            pressure in 10.0f64..200.0,
            volume in 2.0f64..20.0,
            temperature in 100.0f64..600.0,
            process in process(),
        ) {
            let params = ThermodynamicsParams::new(pressure, volume, temperature, process);
            let n = params.molar_amount();
            for s in process_path(&params) {
                let lhs = s.pressure * s.volume;
                let rhs = n * GAS_CONSTANT * s.temperature;
                prop_assert!((lhs - rhs).abs() <= 1e-9 * lhs.max(1.0));
            }
        }
    }
}
