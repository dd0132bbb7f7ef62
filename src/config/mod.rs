//! Lab configuration with YAML schema and validation.
//!
//! Everything the input layer would otherwise hard-code lives here: slider
//! bounds and defaults, chart sampling grids, and the animation tick and
//! canvas mapping. Loading runs three gates:
//! - serde structure (`deny_unknown_fields` catches typos)
//! - `validator` range checks
//! - a semantic pass for cross-field rules

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::domains::electricity::{self, ElectricityParams, ElectricitySliders, RESISTANCE_SWEEP};
use crate::domains::mechanics::{self, MechanicsParams, MechanicsSliders, TIME_SAMPLES};
use crate::domains::optics::{self, OpticsParams, OpticsSliders, INCIDENCE_SWEEP};
use crate::domains::thermodynamics::{
    self, ProcessSampling, ThermodynamicsParams, ThermodynamicsSliders,
};
use crate::engine::animation::{ProjectileAnimation, ScreenProjection};
use crate::engine::clock::{AnimationClock, DEFAULT_TICK_NANOS};
use crate::engine::sampling::{Grid, Series};
use crate::error::{LabError, LabResult};

/// Schema version written by this build.
pub const SCHEMA_VERSION: &str = "1.0";

/// Top-level lab configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LabConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Slider bounds and defaults per domain.
    #[validate(nested)]
    #[serde(default)]
    pub sliders: SlidersConfig,

    /// Chart sampling grids.
    #[validate(nested)]
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Projectile animation settings.
    #[validate(nested)]
    #[serde(default)]
    pub animation: AnimationConfig,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            sliders: SlidersConfig::default(),
            sampling: SamplingConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl LabConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> LabResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> LabResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> LabResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> LabConfigBuilder {
        LabConfigBuilder::default()
    }

    /// Validate constraints that span fields.
    ///
    /// # Errors
    ///
    /// Returns [`LabError::Config`] describing the first violated rule.
    pub fn validate_semantic(&self) -> LabResult<()> {
        let major = self.schema_version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(LabError::config(format!(
                "unsupported schema version {} (expected 1.x)",
                self.schema_version
            )));
        }

        if let Some(problem) = self.sliders.check() {
            return Err(LabError::config(problem));
        }

        electricity::check_sweep(&self.sampling.resistance_sweep)?;

        let incidence = &self.sampling.incidence_sweep;
        if incidence.start < 0.0 || incidence.end() > 90.0 {
            return Err(LabError::config(format!(
                "incidence sweep must stay within [0°, 90°], got [{}, {}]",
                incidence.start,
                incidence.end()
            )));
        }

        let thermo = &self.sampling.thermodynamics;
        if thermo.volume.start <= 0.0 || thermo.pressure.start <= 0.0 {
            return Err(LabError::config(
                "thermodynamics sweeps must start above zero",
            ));
        }

        let projection = &self.animation.projection;
        if projection.x_limit <= projection.origin_x {
            return Err(LabError::config(format!(
                "animation x_limit {} must lie right of origin_x {}",
                projection.x_limit, projection.origin_x
            )));
        }

        Ok(())
    }

    /// Clock for the projectile animation.
    ///
    /// A zero interval (only reachable through the builder) falls back to the
    /// 50 ms default so the animation always makes progress.
    #[must_use]
    pub fn clock(&self) -> AnimationClock {
        match self.animation.tick_ms {
            0 => AnimationClock::default(),
            ms => AnimationClock::from_nanos(ms.saturating_mul(1_000_000)),
        }
    }

    /// Idle projectile animation for `params`, using this configuration.
    #[must_use]
    pub fn animation(&self, params: &MechanicsParams) -> ProjectileAnimation {
        ProjectileAnimation::new(params, self.animation.projection, self.clock())
    }

    /// Mechanics charts on the configured time resolution.
    #[must_use]
    pub fn mechanics_series(&self, params: &MechanicsParams) -> Vec<Series> {
        let samples = self.sampling.mechanics_samples;
        vec![
            mechanics::height_series_with(params, samples),
            mechanics::speed_series_with(params, samples),
        ]
    }

    /// Electricity charts on the configured resistance sweep.
    #[must_use]
    pub fn electricity_series(&self, params: &ElectricityParams) -> Vec<Series> {
        electricity::compute_series_with(params, self.sampling.resistance_sweep)
    }

    /// Optics chart on the configured incidence sweep.
    #[must_use]
    pub fn optics_series(&self, params: &OpticsParams) -> Vec<Series> {
        vec![optics::refraction_series_with(
            params,
            self.sampling.incidence_sweep,
        )]
    }

    /// Thermodynamics chart on the configured process grids.
    #[must_use]
    pub fn thermodynamics_series(&self, params: &ThermodynamicsParams) -> Vec<Series> {
        vec![thermodynamics::process_series_with(
            params,
            &self.sampling.thermodynamics,
        )]
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct LabConfigBuilder {
    sliders: Option<SlidersConfig>,
    mechanics_samples: Option<usize>,
    resistance_sweep: Option<Grid>,
    incidence_sweep: Option<Grid>,
    tick_ms: Option<u64>,
    projection: Option<ScreenProjection>,
}

impl LabConfigBuilder {
    /// Set all slider tables.
    #[must_use]
    pub const fn sliders(mut self, sliders: SlidersConfig) -> Self {
        self.sliders = Some(sliders);
        self
    }

    /// Set the number of samples per mechanics chart.
    #[must_use]
    pub const fn mechanics_samples(mut self, samples: usize) -> Self {
        self.mechanics_samples = Some(samples);
        self
    }

    /// Set the electricity resistance sweep.
    #[must_use]
    pub const fn resistance_sweep(mut self, sweep: Grid) -> Self {
        self.resistance_sweep = Some(sweep);
        self
    }

    /// Set the optics incidence sweep.
    #[must_use]
    pub const fn incidence_sweep(mut self, sweep: Grid) -> Self {
        self.incidence_sweep = Some(sweep);
        self
    }

    /// Set the animation tick interval in milliseconds.
    #[must_use]
    pub const fn tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = Some(tick_ms);
        self
    }

    /// Set the canvas projection.
    #[must_use]
    pub const fn projection(mut self, projection: ScreenProjection) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> LabConfig {
        let mut config = LabConfig::default();

        if let Some(sliders) = self.sliders {
            config.sliders = sliders;
        }
        if let Some(samples) = self.mechanics_samples {
            config.sampling.mechanics_samples = samples;
        }
        if let Some(sweep) = self.resistance_sweep {
            config.sampling.resistance_sweep = sweep;
        }
        if let Some(sweep) = self.incidence_sweep {
            config.sampling.incidence_sweep = sweep;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.animation.tick_ms = tick_ms;
        }
        if let Some(projection) = self.projection {
            config.animation.projection = projection;
        }

        config
    }
}

/// Slider tables for every domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct SlidersConfig {
    /// Projectile sliders.
    #[validate(nested)]
    pub mechanics: MechanicsSliders,
    /// Circuit sliders.
    #[validate(nested)]
    pub electricity: ElectricitySliders,
    /// Refraction sliders.
    #[validate(nested)]
    pub optics: OpticsSliders,
    /// Gas sliders.
    #[validate(nested)]
    pub thermodynamics: ThermodynamicsSliders,
}

impl SlidersConfig {
    /// First inconsistency across all slider tables, if any.
    #[must_use]
    pub fn check(&self) -> Option<String> {
        self.mechanics
            .check()
            .or_else(|| self.electricity.check())
            .or_else(|| self.optics.check())
            .or_else(|| self.thermodynamics.check())
    }
}

/// Chart sampling grids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    /// Samples per mechanics time series.
    #[validate(range(min = 1, max = 100_000))]
    pub mechanics_samples: usize,
    /// Resistance sweep for the electricity charts (Ω).
    #[validate(nested)]
    pub resistance_sweep: Grid,
    /// Incidence sweep for the optics chart (degrees).
    #[validate(nested)]
    pub incidence_sweep: Grid,
    /// Process grids for the thermodynamics chart.
    #[validate(nested)]
    pub thermodynamics: ProcessSampling,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            mechanics_samples: TIME_SAMPLES,
            resistance_sweep: RESISTANCE_SWEEP,
            incidence_sweep: INCIDENCE_SWEEP,
            thermodynamics: ProcessSampling::default(),
        }
    }
}

/// Projectile animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Simulated time per tick (ms).
    #[validate(range(min = 1, max = 1000))]
    pub tick_ms: u64,
    /// World-to-canvas mapping.
    #[validate(nested)]
    pub projection: ScreenProjection,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_NANOS / 1_000_000,
            projection: ScreenProjection::default(),
        }
    }
}
