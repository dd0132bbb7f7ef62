//! CLI argument parsing.
//!
//! Hand-rolled so the parser stays testable: [`Args::parse_from`] accepts
//! any iterator of strings, not just `std::env::args()`.

use std::path::PathBuf;

use crate::domains::{DomainKind, ProcessType};

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// A `--<name> <value>` parameter given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamOverride {
    /// Parameter name without the leading dashes (e.g. "mass").
    pub name: String,
    /// Requested value, before clamping.
    pub value: f64,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Evaluate one simulator and print readouts and chart series.
    Run {
        /// Simulator to evaluate.
        domain: DomainKind,
        /// Parameter overrides, applied in order.
        overrides: Vec<ParamOverride>,
        /// Thermodynamic process override.
        process: Option<ProcessType>,
        /// Optional configuration file.
        config_path: Option<PathBuf>,
        /// Emit JSON instead of text.
        json: bool,
    },
    /// Step the projectile animation until it stops.
    Animate {
        /// Mechanics parameter overrides.
        overrides: Vec<ParamOverride>,
        /// Cap on the number of ticks.
        max_ticks: Option<u64>,
        /// Optional configuration file.
        config_path: Option<PathBuf>,
        /// Emit JSON instead of text.
        json: bool,
    },
    /// Print the default configuration as YAML.
    Defaults,
    /// Validate a configuration file.
    Validate {
        /// Path to the YAML file.
        config_path: PathBuf,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

/// Options shared by `run` and `animate`.
#[derive(Debug, Default)]
struct CommonOptions {
    overrides: Vec<ParamOverride>,
    process: Option<ProcessType>,
    max_ticks: Option<u64>,
    config_path: Option<PathBuf>,
    json: bool,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "run" => Self::parse_run_command(args),
            "animate" => Self::parse_animate_command(args),
            "defaults" => Command::Defaults,
            "validate" => Self::parse_validate_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// Parse the 'run' command arguments.
    fn parse_run_command(args: &[String]) -> Command {
        let Some(name) = args.get(2) else {
            eprintln!("Error: 'run' command requires a simulator name");
            return Command::Help;
        };
        let domain = match name.parse::<DomainKind>() {
            Ok(domain) => domain,
            Err(e) => {
                eprintln!("Error: {e}");
                return Command::Help;
            }
        };

        match Self::parse_options(&args[3..]) {
            Ok(opts) => Command::Run {
                domain,
                overrides: opts.overrides,
                process: opts.process,
                config_path: opts.config_path,
                json: opts.json,
            },
            Err(message) => {
                eprintln!("Error: {message}");
                Command::Help
            }
        }
    }

    /// Parse the 'animate' command arguments.
    fn parse_animate_command(args: &[String]) -> Command {
        match Self::parse_options(&args[2..]) {
            Ok(opts) => Command::Animate {
                overrides: opts.overrides,
                max_ticks: opts.max_ticks,
                config_path: opts.config_path,
                json: opts.json,
            },
            Err(message) => {
                eprintln!("Error: {message}");
                Command::Help
            }
        }
    }

    /// Parse the 'validate' command arguments.
    fn parse_validate_command(args: &[String]) -> Command {
        args.get(2).map_or_else(
            || {
                eprintln!("Error: 'validate' command requires a config file path");
                Command::Help
            },
            |path| Command::Validate {
                config_path: PathBuf::from(path),
            },
        )
    }

    /// Parse `--json`, `--config <file>`, `--process <type>`,
    /// `--max-ticks <n>` and any `--<param> <number>`.
    fn parse_options(rest: &[String]) -> Result<CommonOptions, String> {
        let mut opts = CommonOptions::default();
        let mut iter = rest.iter();

        while let Some(flag) = iter.next() {
            let Some(name) = flag.strip_prefix("--") else {
                return Err(format!("unexpected argument '{flag}'"));
            };
            if name == "json" {
                opts.json = true;
                continue;
            }
            let value = iter
                .next()
                .ok_or_else(|| format!("'--{name}' requires a value"))?;
            match name {
                "config" => opts.config_path = Some(PathBuf::from(value)),
                "process" => {
                    opts.process = Some(value.parse().map_err(|e| format!("{e}"))?);
                }
                "max-ticks" => {
                    opts.max_ticks = Some(
                        value
                            .parse()
                            .map_err(|_| format!("'--max-ticks' expects a count, got '{value}'"))?,
                    );
                }
                param => {
                    let value: f64 = value
                        .parse()
                        .map_err(|_| format!("'--{param}' expects a number, got '{value}'"))?;
                    opts.overrides.push(ParamOverride {
                        name: param.to_string(),
                        value,
                    });
                }
            }
        }

        Ok(opts)
    }
}
