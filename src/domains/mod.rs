//! Physics domains.
//!
//! Each domain is an independent, stateless model:
//! - Mechanics: projectile motion
//! - Electricity: Ohm's law
//! - Optics: Snell's law and total internal reflection
//! - Thermodynamics: ideal gas law with three process types

pub mod electricity;
pub mod mechanics;
pub mod optics;
pub mod thermodynamics;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use electricity::{ElectricityParams, ElectricityResults, ElectricitySliders};
pub use mechanics::{MechanicsParams, MechanicsResults, MechanicsSliders, Trajectory};
pub use optics::{OpticsParams, OpticsResults, OpticsSliders};
pub use thermodynamics::{
    ProcessType, StatePoint, ThermodynamicsParams, ThermodynamicsResults, ThermodynamicsSliders,
};

use crate::engine::{Series, Simulator};
use crate::error::{LabError, LabResult};

/// Projectile motion model.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mechanics;

/// Ohm's law model.
#[derive(Debug, Clone, Copy, Default)]
pub struct Electricity;

/// Snell's law model.
#[derive(Debug, Clone, Copy, Default)]
pub struct Optics;

/// Ideal gas model.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thermodynamics;

impl Simulator for Mechanics {
    type Params = MechanicsParams;
    type Results = MechanicsResults;
    const NAME: &'static str = "mechanics";

    fn compute_results(params: &Self::Params) -> LabResult<Self::Results> {
        mechanics::compute_results(params)
    }

    fn compute_series(params: &Self::Params) -> Vec<Series> {
        mechanics::compute_series(params)
    }

    fn clamp(params: &Self::Params) -> Self::Params {
        params.clamped()
    }
}

impl Simulator for Electricity {
    type Params = ElectricityParams;
    type Results = ElectricityResults;
    const NAME: &'static str = "electricity";

    fn compute_results(params: &Self::Params) -> LabResult<Self::Results> {
        electricity::compute_results(params)
    }

    fn compute_series(params: &Self::Params) -> Vec<Series> {
        electricity::compute_series(params)
    }

    fn clamp(params: &Self::Params) -> Self::Params {
        params.clamped()
    }
}

impl Simulator for Optics {
    type Params = OpticsParams;
    type Results = OpticsResults;
    const NAME: &'static str = "optics";

    fn compute_results(params: &Self::Params) -> LabResult<Self::Results> {
        optics::compute_results(params)
    }

    fn compute_series(params: &Self::Params) -> Vec<Series> {
        optics::compute_series(params)
    }

    fn clamp(params: &Self::Params) -> Self::Params {
        params.clamped()
    }
}

impl Simulator for Thermodynamics {
    type Params = ThermodynamicsParams;
    type Results = ThermodynamicsResults;
    const NAME: &'static str = "thermodynamics";

    fn compute_results(params: &Self::Params) -> LabResult<Self::Results> {
        thermodynamics::compute_results(params)
    }

    fn compute_series(params: &Self::Params) -> Vec<Series> {
        thermodynamics::compute_series(params)
    }

    fn clamp(params: &Self::Params) -> Self::Params {
        params.clamped()
    }
}

/// Runtime selector over the four domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DomainKind {
    /// Projectile motion.
    Mechanics,
    /// Ohm's law.
    Electricity,
    /// Snell's law.
    Optics,
    /// Ideal gas law.
    Thermodynamics,
}

impl DomainKind {
    /// All domains, in lab order.
    pub const ALL: [Self; 4] = [
        Self::Mechanics,
        Self::Electricity,
        Self::Optics,
        Self::Thermodynamics,
    ];

    /// Identifier used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mechanics => Mechanics::NAME,
            Self::Electricity => Electricity::NAME,
            Self::Optics => Optics::NAME,
            Self::Thermodynamics => Thermodynamics::NAME,
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DomainKind {
    type Err = LabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == lower)
            .or(match lower.as_str() {
                "projectile" => Some(Self::Mechanics),
                "ohm" | "circuit" => Some(Self::Electricity),
                "snell" | "refraction" => Some(Self::Optics),
                "gas" | "thermo" => Some(Self::Thermodynamics),
                _ => None,
            })
            .ok_or_else(|| LabError::UnknownSimulator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series_are_clean<S: Simulator>(params: &S::Params) {
        for s in S::compute_series(params) {
            assert!(s.all_finite(), "{}: non-finite point", s.name);
            assert!(s.is_x_ascending(), "{}: x not ascending", s.name);
        }
    }

    #[test]
    fn test_simulators_are_generic() {
        series_are_clean::<Mechanics>(&MechanicsParams::default());
        series_are_clean::<Electricity>(&ElectricityParams::default());
        series_are_clean::<Optics>(&OpticsParams::default());
        series_are_clean::<Thermodynamics>(&ThermodynamicsParams::default());
    }

    #[test]
    fn test_defaults_compute() {
        assert!(Mechanics::compute_results(&MechanicsParams::default()).is_ok());
        assert!(Electricity::compute_results(&ElectricityParams::default()).is_ok());
        assert!(Optics::compute_results(&OpticsParams::default()).is_ok());
        assert!(Thermodynamics::compute_results(&ThermodynamicsParams::default()).is_ok());
    }

    #[test]
    fn test_clamp_through_trait() {
        let p = Electricity::clamp(&ElectricityParams::new(100.0, 0.0));
        assert_eq!(p, ElectricityParams::new(24.0, 0.5));
    }

    #[test]
    fn test_domain_kind_parsing() {
        assert_eq!("optics".parse::<DomainKind>().ok(), Some(DomainKind::Optics));
        assert_eq!("Mechanics".parse::<DomainKind>().ok(), Some(DomainKind::Mechanics));
        assert_eq!("gas".parse::<DomainKind>().ok(), Some(DomainKind::Thermodynamics));
        let err = "chemistry".parse::<DomainKind>();
        assert!(matches!(err, Err(LabError::UnknownSimulator(ref name)) if name == "chemistry"));
    }

    #[test]
    fn test_domain_kind_names_round_trip() {
        for kind in DomainKind::ALL {
            assert_eq!(kind.to_string().parse::<DomainKind>().ok(), Some(kind));
        }
    }
}
