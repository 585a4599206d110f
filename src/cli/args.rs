use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "genomeqa",
    version,
    about = "Assembly-quality features (N50/L50, GC%, contig stats) for FASTA genomes"
)]
pub struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Extract(ExtractArgs),
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// Folder containing multi-FASTA files (*.fa, *.fas, *.fasta).
    #[arg(short = 's', long = "sequencepath")]
    pub sequence_path: PathBuf,

    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,

    /// Compute and print metrics without writing extracted_features.csv.
    #[arg(long, default_value_t = false)]
    pub no_report: bool,

    #[arg(long, value_enum, default_value_t = CacheArg::Existence)]
    pub cache: CacheArg,

    /// Let a later file replace an earlier one with the same sample name.
    #[arg(long, default_value_t = false)]
    pub allow_duplicate_names: bool,

    #[arg(long, value_enum, default_value_t = LayoutArg::Standard)]
    pub layout: LayoutArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CacheArg {
    #[value(name = "existence")]
    Existence,
    #[value(name = "mtime")]
    Mtime,
    #[value(name = "off")]
    Off,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LayoutArg {
    #[value(name = "standard")]
    Standard,
    #[value(name = "extended")]
    Extended,
}
