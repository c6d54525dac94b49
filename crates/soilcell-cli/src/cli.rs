use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "soilcell - Size the treatment cells of a continuous-flow soil remediation facility.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to score candidates.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search cell volumes and counts for the best-balanced facility layout.
    Optimize(OptimizeArgs),
    /// Show the cycle of a single cell size and how many cells the intake requires.
    Cycle(CycleArgs),
}

/// Facility description shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct FacilityArgs {
    /// Path to the facility configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Facility Overrides ---
    /// Override the average incoming soil volume.
    #[arg(short = 'd', long, value_name = "CY_PER_DAY")]
    pub daily_volume: Option<f64>,

    /// Override the required cell depth.
    #[arg(long, value_name = "FEET")]
    pub cell_depth: Option<f64>,

    /// Override the loading equipment rate.
    #[arg(long, value_name = "CY_PER_DAY")]
    pub loading_rate: Option<f64>,

    /// Override the unloading equipment rate.
    #[arg(long, value_name = "CY_PER_DAY")]
    pub unloading_rate: Option<f64>,

    /// Override the Rip phase duration.
    #[arg(long, value_name = "DAYS")]
    pub rip_days: Option<u32>,

    /// Override the Treat phase duration.
    #[arg(long, value_name = "DAYS")]
    pub treat_days: Option<u32>,

    /// Override the Dry phase duration.
    #[arg(long, value_name = "DAYS")]
    pub dry_days: Option<u32>,

    /// Fill cells no faster than soil arrives, overriding the config file.
    #[arg(long)]
    pub pace_load_by_intake: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.count-max=30
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `optimize` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub facility: FacilityArgs,

    // --- Search Overrides ---
    /// Override the smallest cell volume searched.
    #[arg(long, value_name = "CY")]
    pub volume_min: Option<f64>,

    /// Override the largest cell volume searched.
    #[arg(long, value_name = "CY")]
    pub volume_max: Option<f64>,

    /// Override the cell volume step.
    #[arg(long, value_name = "CY")]
    pub volume_step: Option<f64>,

    /// Override the largest cell count searched.
    #[arg(long, value_name = "INT")]
    pub count_max: Option<u32>,

    /// Number of ranked configurations to report.
    #[arg(short = 'n', long = "top", value_name = "INT")]
    pub top: Option<usize>,

    // --- Output ---
    /// Write the ranked shortlist to a CSV file.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `cycle` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CycleArgs {
    #[command(flatten)]
    pub facility: FacilityArgs,

    /// Volume of one treatment cell.
    #[arg(long, required = true, value_name = "CY")]
    pub cell_volume: f64,

    /// Multiplier applied to the theoretical cell count before rounding up.
    #[arg(long, default_value_t = soilcell::core::capacity::DEFAULT_SAFETY_FACTOR, value_name = "FLOAT")]
    pub safety_factor: f64,
}
