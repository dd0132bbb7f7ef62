//! CLI output formatting.
//!
//! Formatting lives in `render_*` functions that return text, so it can be
//! tested without capturing stdout.

use std::fmt::Write as _;

use crate::domains::{ElectricityResults, MechanicsResults, OpticsResults, ThermodynamicsResults};
use crate::engine::{AnimationFrame, Series};

/// Placeholder for a quantity with no defined value.
pub const UNDEFINED: &str = "—";

/// Scalar readouts of a results record, as `(label, formatted value)` rows.
pub trait Readout {
    /// Rows in display order.
    fn readouts(&self) -> Vec<(&'static str, String)>;
}

fn fixed(value: f64, decimals: usize, unit: &str) -> String {
    format!("{value:.decimals$} {unit}")
}

fn optional_degrees(value: Option<f64>) -> String {
    value.map_or_else(|| UNDEFINED.to_string(), |deg| format!("{deg:.2}°"))
}

impl Readout for MechanicsResults {
    fn readouts(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Horizontal velocity", fixed(self.vx, 2, "m/s")),
            ("Vertical velocity", fixed(self.vy, 2, "m/s")),
            ("Max height", fixed(self.max_height, 2, "m")),
            ("Range", fixed(self.range, 2, "m")),
            ("Flight time", fixed(self.flight_time, 2, "s")),
            ("Kinetic energy", fixed(self.kinetic_energy, 2, "J")),
        ]
    }
}

impl Readout for ElectricityResults {
    fn readouts(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Current", fixed(self.current, 2, "A")),
            ("Power", fixed(self.power, 2, "W")),
            ("Energy per hour", fixed(self.energy_per_hour, 0, "J")),
            ("Heat rate", fixed(self.heat_rate, 2, "W")),
            ("Ammeter", fixed(self.current_gauge_percent, 0, "%")),
        ]
    }
}

impl Readout for OpticsResults {
    fn readouts(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Refraction angle", optional_degrees(self.refraction_angle)),
            ("Critical angle", optional_degrees(self.critical_angle)),
            (
                "Total internal reflection",
                if self.total_internal_reflection { "yes" } else { "no" }.to_string(),
            ),
            ("Speed in medium 1", fixed(self.speed_in_medium1, 0, "km/s")),
            ("Speed in medium 2", fixed(self.speed_in_medium2, 0, "km/s")),
        ]
    }
}

impl Readout for ThermodynamicsResults {
    fn readouts(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Amount of substance", fixed(self.molar_amount, 3, "mol")),
            ("PV product", fixed(self.pv_product, 2, "kPa·L")),
            ("Temperature", fixed(self.temperature_celsius, 0, "°C")),
            ("Molecules", format!("{:.2e}", self.molecule_count)),
            ("Particles drawn", self.particle_count.to_string()),
            (
                "Process",
                format!("{} ({})", self.process, self.process.invariant()),
            ),
        ]
    }
}

/// Print version information.
pub fn print_version() {
    println!("physlab {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"physlab - interactive physics lab models

USAGE:
    physlab <COMMAND> [OPTIONS]

COMMANDS:
    run <simulator>             Evaluate a simulator and print readouts
        --<param> <value>       Set a parameter (clamped to slider bounds)
        --process <type>        isothermal | isobaric | isochoric
        --config <file.yaml>    Load slider bounds and sampling grids
        --json                  Emit JSON

    animate                     Step the projectile animation until it stops
        --mass|--velocity|--angle <value>
        --max-ticks <N>         Stop after N ticks
        --config <file.yaml>    Load tick interval and canvas mapping
        --json                  Emit JSON

    defaults                    Print the default configuration as YAML
    validate <file.yaml>        Validate a configuration file
    help                        Show this help message
    version                     Show version information

SIMULATORS:
    mechanics        --mass --velocity --angle
    electricity      --voltage --resistance
    optics           --incidence --n1 --n2
    thermodynamics   --pressure --volume --temperature

EXAMPLES:
    physlab run mechanics --velocity 20 --angle 30
    physlab run optics --incidence 60 --n1 1.5 --n2 1.0
    physlab run thermodynamics --process isobaric --json
    physlab animate --velocity 25 --max-ticks 100

Set RUST_LOG=physlab=debug to trace model evaluation.
"
    );
}

/// Text readout block for one simulator.
#[must_use]
pub fn render_readouts(title: &str, results: &impl Readout) -> String {
    let rows = results.readouts();
    let width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    let mut out = format!("{title}\n");
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<width$}  {value}");
    }
    out
}

/// One-line summary per chart series.
#[must_use]
pub fn render_series_summary(series: &[Series]) -> String {
    let mut out = String::from("Charts\n");
    for s in series {
        match (s.x_range(), s.y_range()) {
            (Some((x0, x1)), Some((y0, y1))) => {
                let _ = writeln!(
                    out,
                    "  {:<24} {:>3} pts  {} ∈ [{x0:.2}, {x1:.2}]  {} ∈ [{y0:.2}, {y1:.2}]",
                    s.name,
                    s.len(),
                    s.x_label,
                    s.y_label,
                );
            }
            _ => {
                let _ = writeln!(out, "  {:<24}   0 pts", s.name);
            }
        }
    }
    out
}

/// One line per animation frame.
#[must_use]
pub fn render_frames(frames: &[AnimationFrame]) -> String {
    let mut out = String::from(" tick      t (s)    x (m)    h (m)   screen (px)      state\n");
    for f in frames {
        let _ = writeln!(
            out,
            "{:>5}  {:>9.2}  {:>7.2}  {:>7.2}   ({:>6.1}, {:>5.1})  {}",
            f.tick,
            f.t,
            f.x,
            f.h,
            f.screen_x,
            f.screen_y,
            f.state.label()
        );
    }
    out
}

/// Print animation frames.
pub fn print_frames(frames: &[AnimationFrame]) {
    print!("{}", render_frames(frames));
}
