use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "BulgeFF CLI - classifies RNA bulge nucleotides by sugar pucker, matches them against prototype conformers and writes PLUMED bias definitions.",
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

    /// Write logs to a specified file in addition to the console output (e.g. BulgeFix.log)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match bulge residues against prototype conformers and write a PLUMED input file.
    Run(RunArgs),
    /// Print the pseudorotation phase and sugar pucker of bulge residues.
    Pucker(PuckerArgs),
    /// Manage the local data directory holding prototype libraries and function tables.
    Data(DataArgs),
}

/// Residues to process, given as parallel lists of names and numbers.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Bulge residue names, e.g. `--bulge-name G U`.
    #[arg(long = "bulge-name", value_name = "NAME", num_args = 1.., default_values_t = vec!["G".to_string()])]
    pub bulge_names: Vec<String>,

    /// Bulge residue numbers, paired with the names by position, e.g. `--bulge-id 6 9`.
    #[arg(long = "bulge-id", value_name = "ID", num_args = 1.., default_values_t = vec![6], allow_negative_numbers = true)]
    pub bulge_ids: Vec<isize>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Input Structures ---
    /// Structure containing the bulge; used for the fragment and the sugar pucker.
    #[arg(long, value_name = "PATH", default_value = "2jym.pdb")]
    pub bulge_pdb: PathBuf,

    /// MD starting structure; atom serials of the eta/theta torsions are taken from it.
    #[arg(long, value_name = "PATH", default_value = "reference.pdb")]
    pub md_pdb: PathBuf,

    #[command(flatten)]
    pub targets: TargetArgs,

    // --- Data Locations ---
    /// Root of the data directory (containing `prototype_db/` and `function/`).
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Override the prototype library directory.
    #[arg(long, value_name = "PATH")]
    pub prototype_dir: Option<PathBuf>,

    /// Override the bias function table.
    #[arg(long, value_name = "PATH")]
    pub function_table: Option<PathBuf>,

    // --- Output ---
    /// Path of the PLUMED input file to write.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also write each extracted trinucleotide as `<name><id>_fragment.pdb` into this directory.
    #[arg(long, value_name = "PATH")]
    pub fragment_dir: Option<PathBuf>,

    // --- Configuration ---
    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S matching.c2-endo-threshold=1.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `pucker` subcommand.
#[derive(Args, Debug)]
pub struct PuckerArgs {
    /// Structure containing the residues to analyse.
    #[arg(long, value_name = "PATH", default_value = "2jym.pdb")]
    pub bulge_pdb: PathBuf,

    #[command(flatten)]
    pub targets: TargetArgs,
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

/// Available commands for data management.
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show the absolute path to the local data directory.
    Path,
    /// Set a custom absolute path for the local data directory.
    SetPath {
        /// The directory containing `prototype_db/` and `function/fix_function.txt`.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the data path to its default, OS-specific location.
    ResetPath,
}
