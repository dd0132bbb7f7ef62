//! CLI module for physlab.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested. The
//! entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, ParamOverride};
pub use commands::{
    animation_frames, apply_electricity, apply_mechanics, apply_optics, apply_thermodynamics,
    evaluate, load_config, mechanics_params, run_cli, SimulationReport,
};
pub use output::{
    print_frames, print_help, print_version, render_frames, render_readouts,
    render_series_summary, Readout, UNDEFINED,
};
