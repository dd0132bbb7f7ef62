//! CLI command handlers.
//!
//! The CLI plays the input layer: it owns the parameter record, applies the
//! user's overrides, clamps them to the configured slider bounds and hands
//! the result to the pure model functions.

use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::LabConfig;
use crate::domains::{
    DomainKind, Electricity, ElectricityParams, Mechanics, MechanicsParams, Optics, OpticsParams,
    ProcessType, Thermodynamics, ThermodynamicsParams,
};
use crate::engine::{AnimationFrame, ProjectileAnimation, Series, Simulator};
use crate::error::{LabError, LabResult};

use super::args::ParamOverride;
use super::output::{
    print_frames, print_help, print_version, render_readouts, render_series_summary, Readout,
};
use super::{Args, Command};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let outcome = match args.command {
        Command::Run {
            domain,
            overrides,
            process,
            config_path,
            json,
        } => run_simulator(domain, &overrides, process, config_path.as_deref(), json),
        Command::Animate {
            overrides,
            max_ticks,
            config_path,
            json,
        } => animate(&overrides, max_ticks, config_path.as_deref(), json),
        Command::Defaults => print_defaults(),
        Command::Validate { config_path } => validate_config(&config_path),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Everything one `run` produces, in a serializable shape.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport<P, R> {
    /// Simulator name.
    pub simulator: &'static str,
    /// Parameters after clamping.
    pub params: P,
    /// Derived readouts.
    pub results: R,
    /// Chart series.
    pub series: Vec<Series>,
}

/// Load the configuration file if one was given, defaults otherwise.
///
/// # Errors
///
/// Returns error if the file cannot be read, parsed or validated.
pub fn load_config(path: Option<&Path>) -> LabResult<LabConfig> {
    path.map_or_else(
        || Ok(LabConfig::default()),
        |path| {
            let config = LabConfig::load(path)?;
            info!(path = %path.display(), "configuration loaded");
            Ok(config)
        },
    )
}

fn unknown_param(domain: &str, name: &str) -> LabError {
    LabError::config(format!("'{name}' is not a {domain} parameter"))
}

/// Apply `--<param>` overrides to mechanics parameters.
///
/// # Errors
///
/// Returns [`LabError::Config`] for a name mechanics does not have.
pub fn apply_mechanics(params: &mut MechanicsParams, overrides: &[ParamOverride]) -> LabResult<()> {
    for o in overrides {
        match o.name.as_str() {
            "mass" | "m" => params.mass = o.value,
            "velocity" | "v" => params.velocity = o.value,
            "angle" => params.angle = o.value,
            other => return Err(unknown_param(Mechanics::NAME, other)),
        }
    }
    Ok(())
}

/// Apply `--<param>` overrides to electricity parameters.
///
/// # Errors
///
/// Returns [`LabError::Config`] for a name electricity does not have.
pub fn apply_electricity(
    params: &mut ElectricityParams,
    overrides: &[ParamOverride],
) -> LabResult<()> {
    for o in overrides {
        match o.name.as_str() {
            "voltage" | "u" => params.voltage = o.value,
            "resistance" | "r" => params.resistance = o.value,
            other => return Err(unknown_param(Electricity::NAME, other)),
        }
    }
    Ok(())
}

/// Apply `--<param>` overrides to optics parameters.
///
/// # Errors
///
/// Returns [`LabError::Config`] for a name optics does not have.
pub fn apply_optics(params: &mut OpticsParams, overrides: &[ParamOverride]) -> LabResult<()> {
    for o in overrides {
        match o.name.as_str() {
            "incidence" | "incidence-angle" | "angle" => params.incidence_angle = o.value,
            "n1" => params.n1 = o.value,
            "n2" => params.n2 = o.value,
            other => return Err(unknown_param(Optics::NAME, other)),
        }
    }
    Ok(())
}

/// Apply `--<param>` overrides to thermodynamics parameters.
///
/// # Errors
///
/// Returns [`LabError::Config`] for a name thermodynamics does not have.
pub fn apply_thermodynamics(
    params: &mut ThermodynamicsParams,
    overrides: &[ParamOverride],
) -> LabResult<()> {
    for o in overrides {
        match o.name.as_str() {
            "pressure" | "p" => params.pressure = o.value,
            "volume" | "v" => params.volume = o.value,
            "temperature" | "t" => params.temperature = o.value,
            other => return Err(unknown_param(Thermodynamics::NAME, other)),
        }
    }
    Ok(())
}

/// Warn when clamping changed what the user asked for.
fn note_clamp<P: PartialEq + std::fmt::Debug>(simulator: &str, requested: &P, clamped: &P) {
    if requested != clamped {
        warn!(simulator, ?requested, ?clamped, "parameters clamped to slider bounds");
    }
}

/// Mechanics parameters from config defaults, overrides and clamping.
///
/// # Errors
///
/// Returns error for an unknown parameter name.
pub fn mechanics_params(config: &LabConfig, overrides: &[ParamOverride]) -> LabResult<MechanicsParams> {
    let sliders = &config.sliders.mechanics;
    let mut params = sliders.defaults();
    apply_mechanics(&mut params, overrides)?;
    let clamped = sliders.clamp(&params);
    note_clamp(Mechanics::NAME, &params, &clamped);
    Ok(clamped)
}

fn build_report<S: Simulator>(
    params: S::Params,
    series: Vec<Series>,
) -> LabResult<SimulationReport<S::Params, S::Results>> {
    Ok(SimulationReport {
        simulator: S::NAME,
        results: S::compute_results(&params)?,
        params,
        series,
    })
}

/// Evaluate one simulator and render it as JSON or text.
///
/// # Errors
///
/// Returns error for unknown parameters, a bad config, or a contract
/// violation the slider bounds let through.
pub fn evaluate(
    domain: DomainKind,
    overrides: &[ParamOverride],
    process: Option<ProcessType>,
    config: &LabConfig,
    json: bool,
) -> LabResult<String> {
    match domain {
        DomainKind::Mechanics => {
            let params = mechanics_params(config, overrides)?;
            let report = build_report::<Mechanics>(params, config.mechanics_series(&params))?;
            render(&report, json)
        }
        DomainKind::Electricity => {
            let sliders = &config.sliders.electricity;
            let mut params = sliders.defaults();
            apply_electricity(&mut params, overrides)?;
            let clamped = sliders.clamp(&params);
            note_clamp(Electricity::NAME, &params, &clamped);
            let report = build_report::<Electricity>(clamped, config.electricity_series(&clamped))?;
            render(&report, json)
        }
        DomainKind::Optics => {
            let sliders = &config.sliders.optics;
            let mut params = sliders.defaults();
            apply_optics(&mut params, overrides)?;
            let clamped = sliders.clamp(&params);
            note_clamp(Optics::NAME, &params, &clamped);
            let report = build_report::<Optics>(clamped, config.optics_series(&clamped))?;
            render(&report, json)
        }
        DomainKind::Thermodynamics => {
            let sliders = &config.sliders.thermodynamics;
            let mut params = sliders.defaults();
            apply_thermodynamics(&mut params, overrides)?;
            if let Some(process) = process {
                params.process = process;
            }
            let clamped = sliders.clamp(&params);
            note_clamp(Thermodynamics::NAME, &params, &clamped);
            let report =
                build_report::<Thermodynamics>(clamped, config.thermodynamics_series(&clamped))?;
            render(&report, json)
        }
    }
}

fn render<P, R>(report: &SimulationReport<P, R>, json: bool) -> LabResult<String>
where
    P: Serialize,
    R: Serialize + Readout,
{
    if json {
        return serde_json::to_string_pretty(report)
            .map_err(|e| LabError::serialization(e.to_string()));
    }
    let mut out = render_readouts(report.simulator, &report.results);
    out.push('\n');
    out.push_str(&render_series_summary(&report.series));
    Ok(out)
}

/// Evaluate and print one simulator.
fn run_simulator(
    domain: DomainKind,
    overrides: &[ParamOverride],
    process: Option<ProcessType>,
    config_path: Option<&Path>,
    json: bool,
) -> LabResult<()> {
    let config = load_config(config_path)?;
    if process.is_some() && domain != DomainKind::Thermodynamics {
        warn!(%domain, "--process only applies to thermodynamics; ignored");
    }
    let text = evaluate(domain, overrides, process, &config, json)?;
    println!("{text}");
    Ok(())
}

/// Run the projectile animation to completion (or the tick cap).
///
/// # Errors
///
/// Returns error for unknown parameters or a bad config.
pub fn animation_frames(
    overrides: &[ParamOverride],
    max_ticks: Option<u64>,
    config: &LabConfig,
) -> LabResult<Vec<AnimationFrame>> {
    let params = mechanics_params(config, overrides)?;
    let mut clock = config.clock();
    if let Some(max) = max_ticks {
        clock.set_max_ticks(max);
    }
    let mut animation = ProjectileAnimation::new(&params, config.animation.projection, clock);
    let frames = animation.run_to_end();
    info!(
        frames = frames.len(),
        state = animation.state().label(),
        "animation finished"
    );
    Ok(frames)
}

fn animate(
    overrides: &[ParamOverride],
    max_ticks: Option<u64>,
    config_path: Option<&Path>,
    json: bool,
) -> LabResult<()> {
    let config = load_config(config_path)?;
    let frames = animation_frames(overrides, max_ticks, &config)?;
    if json {
        let text = serde_json::to_string_pretty(&frames)
            .map_err(|e| LabError::serialization(e.to_string()))?;
        println!("{text}");
    } else {
        print_frames(&frames);
    }
    Ok(())
}

fn print_defaults() -> LabResult<()> {
    print!("{}", LabConfig::default().to_yaml()?);
    Ok(())
}

fn validate_config(path: &Path) -> LabResult<()> {
    LabConfig::load(path)?;
    println!("✓ {} is a valid physlab configuration", path.display());
    Ok(())
}
