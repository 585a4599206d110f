use crate::core::error::{ExtractError, ParseError};
use crate::core::fasta;
use crate::core::locate::{self, DuplicatePolicy, SampleFile};
use crate::core::model::{FeatureSchema, SampleMetrics, SampleTable};
use crate::core::stats::sample_metrics;
use crate::core::timing::{log_stage, stats_enabled};
use crate::report;
use crossbeam_channel as channel;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Instant, SystemTime};

/// When an existing report lets extraction be skipped.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CacheMode {
    /// Any existing report is reused, even if inputs changed since.
    #[default]
    Existence,
    /// Reused only when the report is at least as new as every input file.
    Mtime,
    Disabled,
}

#[derive(Clone, Debug)]
pub struct ExtractConfig {
    pub dir: PathBuf,
    pub write_report: bool,
    pub cache: CacheMode,
    pub duplicates: DuplicatePolicy,
    pub schema: FeatureSchema,
    pub threads: usize,
}

impl ExtractConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_report: true,
            cache: CacheMode::default(),
            duplicates: DuplicatePolicy::default(),
            schema: FeatureSchema::default(),
            threads: num_cpus::get(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReportStatus {
    /// Extraction skipped; the table was read back from this report.
    Cached(PathBuf),
    Written(PathBuf),
    NotRequested,
    /// Not written because at least one sample failed.
    Withheld,
}

#[derive(Debug)]
pub struct SampleFailure {
    pub sample: String,
    pub error: ParseError,
}

#[derive(Debug)]
pub struct Extraction {
    pub table: SampleTable,
    pub failures: Vec<SampleFailure>,
    pub report: ReportStatus,
}

/// Computes metrics for every recognised sequence file in `cfg.dir`.
///
/// Directory-level problems abort the call. A file that fails to parse is
/// recorded in [`Extraction::failures`] and the remaining samples still run;
/// the report is then withheld so an incomplete table is never cached.
pub fn extract(cfg: &ExtractConfig) -> Result<Extraction, ExtractError> {
    if cfg.threads == 0 {
        return Err(ExtractError::Config("threads must be >= 1".to_string()));
    }
    let stats = stats_enabled();
    let t_total = Instant::now();
    let report_path = report::report_path(&cfg.dir);

    if cfg.cache == CacheMode::Existence && report_path.is_file() {
        return cached(&report_path);
    }

    let t_locate = Instant::now();
    let samples = locate::locate(&cfg.dir, cfg.duplicates)?;
    log_stage(stats, "engine.locate", t_locate);
    log::info!("found {} samples in {}", samples.len(), cfg.dir.display());

    if cfg.cache == CacheMode::Mtime && report_is_fresh(&report_path, &samples) {
        return cached(&report_path);
    }

    let t_compute = Instant::now();
    let outcomes = compute(&samples, cfg.threads)?;
    log_stage(stats, "engine.compute", t_compute);

    let mut rows = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (sample, outcome) in samples.iter().zip(outcomes) {
        match outcome {
            Ok(metrics) => rows.push(metrics),
            Err(error) => {
                log::error!("sample {}: {}", sample.name, error);
                failures.push(SampleFailure {
                    sample: sample.name.clone(),
                    error,
                });
            }
        }
    }
    let table = SampleTable::new(FeatureSchema::Extended, rows);

    let report = if !cfg.write_report {
        ReportStatus::NotRequested
    } else if !failures.is_empty() {
        log::warn!(
            "{} of {} samples failed; not writing {}",
            failures.len(),
            samples.len(),
            report_path.display()
        );
        ReportStatus::Withheld
    } else {
        let t_report = Instant::now();
        report::csv::write(&report_path, &table, cfg.schema)?;
        log_stage(stats, "engine.report", t_report);
        log::info!("wrote {}", report_path.display());
        ReportStatus::Written(report_path)
    };

    log_stage(stats, "engine.total", t_total);
    Ok(Extraction {
        table,
        failures,
        report,
    })
}

fn cached(report_path: &Path) -> Result<Extraction, ExtractError> {
    log::info!("{} exists; skipping extraction", report_path.display());
    let table = report::csv::read(report_path)?;
    Ok(Extraction {
        table,
        failures: Vec::new(),
        report: ReportStatus::Cached(report_path.to_path_buf()),
    })
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn report_is_fresh(report_path: &Path, samples: &[SampleFile]) -> bool {
    let Some(report_time) = modified(report_path) else {
        return false;
    };
    samples.iter().all(|s| match modified(&s.path) {
        Some(t) => t <= report_time,
        None => false,
    })
}

type Outcome = Result<SampleMetrics, ParseError>;

/// Runs samples through a worker pool and returns outcomes in input order.
fn compute(samples: &[SampleFile], threads: usize) -> Result<Vec<Outcome>, ExtractError> {
    let workers = threads.min(samples.len()).max(1);
    // Spare threads go to parallel gzip decompression inside each worker.
    let decompress_threads = (threads / workers).max(1);

    let (job_tx, job_rx) = channel::bounded::<(usize, &SampleFile)>(workers * 2);
    let (result_tx, result_rx) = channel::unbounded::<(usize, Outcome)>();
    let mut parts: Vec<Option<Outcome>> = (0..samples.len()).map(|_| None).collect();

    thread::scope(|scope| {
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = result_tx.clone();
            scope.spawn(move || {
                for (index, sample) in rx.iter() {
                    let outcome = fasta::load(&sample.path, decompress_threads)
                        .map(|contigs| sample_metrics(&sample.name, &contigs));
                    if tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        for job in samples.iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);

        for (index, outcome) in result_rx.iter() {
            parts[index] = Some(outcome);
        }
    });

    parts
        .into_iter()
        .zip(samples)
        .map(|(part, sample)| {
            part.ok_or_else(|| ExtractError::Pool(format!("no result for sample {}", sample.name)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    #[test]
    fn zero_threads_is_a_config_error() {
        let dir = fixture(&[("a.fa", ">a\nAC\n")]);
        let mut cfg = ExtractConfig::new(dir.path());
        cfg.threads = 0;
        assert!(matches!(extract(&cfg), Err(ExtractError::Config(_))));
    }

    #[test]
    fn compute_keeps_input_order_with_many_workers() {
        let files: Vec<(String, String)> = (0..40)
            .map(|i| (format!("s{i:02}.fa"), format!(">c\n{}\n", "A".repeat(i + 1))))
            .collect();
        let refs: Vec<(&str, &str)> = files.iter().map(|(n, b)| (n.as_str(), b.as_str())).collect();
        let dir = fixture(&refs);
        let samples = locate::locate(dir.path(), DuplicatePolicy::Reject).unwrap();

        let outcomes = compute(&samples, 8).unwrap();
        for (i, outcome) in outcomes.iter().enumerate() {
            let metrics = outcome.as_ref().unwrap();
            assert_eq!(metrics.name, format!("s{i:02}"));
            assert_eq!(metrics.total_length, i as u64 + 1);
        }
    }

    #[test]
    fn mtime_cache_recomputes_when_input_is_newer() {
        let dir = fixture(&[("a.fa", ">a\nACGT\n")]);
        let report = report::report_path(dir.path());
        fs::write(&report, format!("{}\n", FeatureSchema::Standard.header())).unwrap();
        let samples = locate::locate(dir.path(), DuplicatePolicy::Reject).unwrap();

        let old = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        fs::File::options()
            .write(true)
            .open(&report)
            .unwrap()
            .set_modified(old)
            .unwrap();
        assert!(!report_is_fresh(&report, &samples));

        let mut cfg = ExtractConfig::new(dir.path());
        cfg.cache = CacheMode::Mtime;
        let out = extract(&cfg).unwrap();
        assert_eq!(out.report, ReportStatus::Written(report.clone()));
        assert!(report_is_fresh(&report, &samples));

        let again = extract(&cfg).unwrap();
        assert_eq!(again.report, ReportStatus::Cached(report));
        assert_eq!(again.table.get("a").map(|s| s.gc_percent), Some(50.0));
    }
}
