//! # physlab
//!
//! Physics models behind an interactive school lab: projectile motion,
//! Ohm's law, Snell's law and the ideal gas law.
//!
//! Every model is a pure function pair: parameters to scalar readouts
//! (`compute_results`) and parameters to chart series (`compute_series`).
//! Mathematical domain failures come back as explicit sentinels (`None`,
//! flags, dropped samples), never as NaN.
//!
//! ## Example
//!
//! ```rust
//! use physlab::prelude::*;
//!
//! let params = ElectricityParams::new(12.0, 6.0);
//! let results = Electricity::compute_results(&params)?;
//! assert!((results.current - 2.0).abs() < 1e-12);
//!
//! let series = Electricity::compute_series(&params);
//! assert!(series.iter().all(Series::all_finite));
//! # Ok::<(), physlab::LabError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,
    clippy::imprecise_flops,
    clippy::missing_const_for_fn,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp))]

pub mod cli;
pub mod config;
pub mod domains;
pub mod engine;
pub mod error;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{LabConfig, LabConfigBuilder};
    pub use crate::domains::{
        DomainKind, Electricity, ElectricityParams, ElectricityResults, ElectricitySliders,
        Mechanics, MechanicsParams, MechanicsResults, MechanicsSliders, Optics, OpticsParams,
        OpticsResults, OpticsSliders, ProcessType, Thermodynamics, ThermodynamicsParams,
        ThermodynamicsResults, ThermodynamicsSliders, Trajectory,
    };
    pub use crate::engine::{
        AnimationClock, AnimationEvent, AnimationState, Grid, ParamSpec, ProjectileAnimation,
        ScreenProjection, Series, SeriesPoint, SimTime, Simulator, StopReason,
    };
    pub use crate::error::{LabError, LabResult};
}

/// Re-export for public API
pub use error::{LabError, LabResult};
