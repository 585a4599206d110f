use crate::cli::args::{CacheArg, Cli, Commands, ExtractArgs, LayoutArg};
use anyhow::{Context, Result, bail};
use clap::Parser;
use genomeqa::core::timing::{fmt_dur, log_stage, stats_enabled};
use genomeqa::{CacheMode, DuplicatePolicy, ExtractConfig, FeatureSchema, ReportStatus};
use log::Level;
use std::time::Instant;

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::Debug } else { Level::Info };
    simple_logger::init_with_level(level).context("failed to initialise logger")?;
    match cli.command {
        Commands::Extract(args) => run(args),
    }
}

fn run(args: ExtractArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    let t_preflight = Instant::now();
    if !args.sequence_path.is_dir() {
        bail!(
            "sequence path is not a directory: {}",
            args.sequence_path.display()
        );
    }
    if args.threads == 0 {
        bail!("--threads must be >= 1");
    }
    log_stage(stats, "preflight", t_preflight);

    let config = ExtractConfig {
        dir: args.sequence_path.clone(),
        write_report: !args.no_report,
        cache: match args.cache {
            CacheArg::Existence => CacheMode::Existence,
            CacheArg::Mtime => CacheMode::Mtime,
            CacheArg::Off => CacheMode::Disabled,
        },
        duplicates: if args.allow_duplicate_names {
            DuplicatePolicy::LastWins
        } else {
            DuplicatePolicy::Reject
        },
        schema: match args.layout {
            LayoutArg::Standard => FeatureSchema::Standard,
            LayoutArg::Extended => FeatureSchema::Extended,
        },
        threads: args.threads,
    };

    let t_extract = Instant::now();
    let extraction = genomeqa::extract(&config).with_context(|| {
        format!(
            "feature extraction failed for {}",
            args.sequence_path.display()
        )
    })?;
    log_stage(stats, "extract", t_extract);

    for sample in &extraction.table {
        log::info!(
            "{}: length={} contigs={} longest={} N50={} L50={} GC={:.2}%",
            sample.name,
            sample.total_length,
            sample.num_contigs,
            sample.longest_contig,
            sample.n50,
            sample.l50,
            sample.gc_percent
        );
    }
    match &extraction.report {
        ReportStatus::Cached(path) => log::info!("reused {}", path.display()),
        ReportStatus::Written(path) => log::info!("report written to {}", path.display()),
        ReportStatus::NotRequested | ReportStatus::Withheld => {}
    }

    if stats {
        eprintln!("GENOMEQA_STATS total={}", fmt_dur(t0.elapsed()));
    }

    if !extraction.failures.is_empty() {
        bail!(
            "{} sample(s) could not be parsed: {}",
            extraction.failures.len(),
            extraction
                .failures
                .iter()
                .map(|f| f.sample.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}
