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
    about = "adscreen - locate activation and DNA-binding domains, and score AlphaFold-multimer predictions of transcription-factor complexes.",
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

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S scoring.pae-cutoff=12
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search FASTA files for activation domains using exemplar peptides.
    AdLocate(AdLocateArgs),
    /// Locate DNA-binding domains from family alignments, falling back to UniProt features.
    DbdLocate(DbdLocateArgs),
    /// Build or filter custom pairing lists for multimer predictions.
    Pairs(PairsArgs),
    /// Score prediction directories with LIS/LIA and classify each protein pair.
    Lis(LisArgs),
    /// Screen a job listing for predictions with confident inter-chain PAE.
    Screen(ScreenArgs),
    /// Compare a domain of predicted models against a reference structure.
    Compare(CompareArgs),
    /// Find candidate activation regions from AlphaMissense pathogenicity and pLDDT.
    Novel(NovelArgs),
}

/// Arguments for the `ad-locate` subcommand.
#[derive(Args, Debug)]
pub struct AdLocateArgs {
    /// Directory of single-sequence FASTA files (*.fa).
    #[arg(short, long, required = true, value_name = "DIR")]
    pub fasta_dir: PathBuf,

    /// Exemplar table (.xlsx, .csv or .tsv) with Gene, Fragment and Sequence columns.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub exemplars: PathBuf,

    /// Worksheet holding the exemplars when the table is a workbook.
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Directory for the per-file location reports.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,
}

/// Arguments for the `dbd-locate` subcommand.
#[derive(Args, Debug)]
pub struct DbdLocateArgs {
    /// Directory of FASTA files (*.fa).
    #[arg(short, long, required = true, value_name = "DIR")]
    pub fasta_dir: PathBuf,

    /// Directory of per-family DBD alignments (*.fa), or an exemplar table.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub exemplars: PathBuf,

    /// Directory for the location reports and the valid/missing logs.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Do not query UniProt for records without an exemplar match.
    #[arg(long)]
    pub offline: bool,
}

/// Arguments for the `pairs` subcommand.
#[derive(Args, Debug)]
pub struct PairsArgs {
    #[command(subcommand)]
    pub command: PairsCommands,
}

#[derive(Subcommand, Debug)]
pub enum PairsCommands {
    /// Pair a target domain with every activation domain found by `ad-locate`.
    Build {
        /// Name of the target protein, written as the first entry of every line.
        #[arg(short, long, required = true, value_name = "NAME")]
        target: String,

        /// Target domain range, e.g. 1660-1840.
        #[arg(short, long, required = true, value_name = "START-END")]
        domain: String,

        /// Domain annotation file that must mention the target domain.
        #[arg(long, value_name = "PATH")]
        domains_file: Option<PathBuf>,

        /// Directory of activation-domain location files written by `ad-locate`.
        #[arg(short, long, required = true, value_name = "DIR")]
        ad_dir: PathBuf,

        /// Output pairing list.
        #[arg(short, long, required = true, value_name = "PATH")]
        output: PathBuf,
    },
    /// Remove short N-terminal ranges and lines left without a partner.
    Filter {
        /// Input pairing list.
        #[arg(short, long, required = true, value_name = "PATH")]
        input: PathBuf,

        /// Output pairing list.
        #[arg(short, long, required = true, value_name = "PATH")]
        output: PathBuf,

        /// Largest end of an N-terminal range (1-N) that is removed.
        #[arg(long, value_name = "INT")]
        max_end: Option<usize>,
    },
}

/// Arguments for the `lis` subcommand.
#[derive(Args, Debug)]
pub struct LisArgs {
    /// Directory holding one subdirectory per predicted complex.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub predictions_dir: PathBuf,

    /// Only score subdirectories whose names start with this prefix.
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Label of the first protein in the output tables.
    #[arg(long, default_value = "A", value_name = "NAME")]
    pub protein_1: String,

    /// Label of the second protein in the output tables.
    #[arg(long, default_value = "B", value_name = "NAME")]
    pub protein_2: String,

    /// Directory for the prediction and threshold tables.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Override the PAE cutoff from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub pae_cutoff: Option<f64>,

    /// Override the chain whose length splits the PAE matrix (default: first chain in the PDB).
    #[arg(long, value_name = "CHAIN")]
    pub partition_chain: Option<char>,
}

/// Arguments for the `screen` subcommand.
#[derive(Args, Debug)]
pub struct ScreenArgs {
    /// Directory holding one subdirectory per job group.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub predictions_dir: PathBuf,

    /// Job listing with `group:` headers followed by the files each group must contain.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub listing: PathBuf,

    /// Directory for good_jobs.csv.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Override the inter-chain PAE cutoff from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub cutoff: Option<f64>,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Reference structure (PDB).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub reference: PathBuf,

    /// Directory searched recursively for predicted models.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub predictions_dir: PathBuf,

    /// Directory for the RMSD, distance and contact-map tables.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Override the contact distance threshold in Ångström.
    #[arg(long, value_name = "FLOAT")]
    pub contact_threshold: Option<f64>,
}

/// Arguments for the `novel` subcommand.
#[derive(Args, Debug)]
pub struct NovelArgs {
    /// Directory of FASTA files named <TF>_<UniProt>.fa.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub fasta_dir: PathBuf,

    /// Directory searched for the prediction of each UniProt ID.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub predictions_dir: PathBuf,

    /// Output table (tab-separated).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}
