use clap::{Args, Parser, Subcommand};
use radfrag::core::fragmentation::StrategyKind;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "radfrag developers",
    version,
    about = "radfrag - Finds how many fragment-ion masses are needed to tell each digested proteoform apart from its precursor-mass competitors.",
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

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the candidate index, group by precursor mass and search for discriminating fragments.
    Explore(ExploreArgs),
    /// Build (or reuse) the candidate index and fragment histogram only.
    Index(ExploreArgs),
}

/// Arguments shared by the `explore` and `index` subcommands.
#[derive(Args, Debug, Clone)]
pub struct ExploreArgs {
    // --- Core Arguments ---
    /// Path to the digested proteoform table (tab-separated).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory that receives the index, histogram and result artifacts.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Analysis Overrides ---
    /// Species label used to name the artifacts.
    #[arg(long, value_name = "NAME")]
    pub species: Option<String>,

    /// Ambiguity level: 1 compares against every candidate, 2 ignores the same molecule.
    #[arg(long, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(1..=2))]
    pub ambiguity_level: Option<u8>,

    // --- Tolerance Overrides ---
    /// Precursor and fragment mass tolerance in parts per million.
    #[arg(long, value_name = "FLOAT", allow_hyphen_values = true)]
    pub ppm: Option<f64>,

    /// Number of missed monoisotopic peaks tolerated on the precursor.
    #[arg(long, value_name = "INT")]
    pub missed_monoisotopics: Option<u32>,

    // --- Fragmentation Overrides ---
    /// Fragmentation strategy: 'terminal', 'backbone' or 'residue-site'.
    #[arg(long, value_name = "NAME")]
    pub strategy: Option<StrategyKind>,

    /// Maximum number of variable modifications per proteoform.
    #[arg(long = "mods", value_name = "INT")]
    pub variable_mod_count: Option<usize>,

    /// Maximum number of fragmentation events per candidate.
    #[arg(long = "events", value_name = "INT")]
    pub max_fragmentation_events: Option<usize>,

    // --- Execution Overrides ---
    /// Number of resumable chunks the search is split into.
    #[arg(long = "chunks", value_name = "INT")]
    pub chunk_count: Option<usize>,

    /// Recompute every artifact even if it already exists.
    #[arg(long = "override")]
    pub override_existing: bool,

    /// Check the record count of existing chunk files before reusing them.
    #[arg(long)]
    pub verify_chunks: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.max-exhaustive-pool=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
