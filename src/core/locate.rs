use crate::core::error::DiscoveryError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions matched by the locator. `.fsa`, `.fna`, `.faa` and friends are
/// deliberately absent.
pub const SEQUENCE_EXTENSIONS: [&str; 3] = ["fa", "fas", "fasta"];

const GZIP_SUFFIX: &str = ".gz";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SampleFile {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    /// Later file (in sorted path order) replaces the earlier one in place.
    LastWins,
}

/// Sample identifier for a sequence file name, or `None` when the file is not
/// a recognised sequence file.
pub fn sample_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if file_name.starts_with('.') {
        return None;
    }
    let base = file_name.strip_suffix(GZIP_SUFFIX).unwrap_or(file_name);
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || !SEQUENCE_EXTENSIONS.contains(&ext) {
        return None;
    }
    Some(stem.to_string())
}

/// Lists the sequence files directly inside `dir`, sorted by path.
pub fn locate(dir: &Path, policy: DuplicatePolicy) -> Result<Vec<SampleFile>, DiscoveryError> {
    let unreadable = |source| DiscoveryError::Unreadable {
        dir: dir.to_path_buf(),
        source,
    };
    let root = fs::canonicalize(dir).map_err(unreadable)?;
    let mut paths = Vec::new();
    for entry in fs::read_dir(&root).map_err(unreadable)? {
        let path = entry.map_err(unreadable)?.path();
        if path.is_file() && sample_name(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut samples: Vec<SampleFile> = Vec::with_capacity(paths.len());
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(paths.len());
    for path in paths {
        let Some(name) = sample_name(&path) else {
            continue;
        };
        match seen.get(&name).copied() {
            Some(idx) => match policy {
                DuplicatePolicy::Reject => {
                    return Err(DiscoveryError::DuplicateSample {
                        sample: name,
                        first: samples[idx].path.clone(),
                        second: path,
                    });
                }
                DuplicatePolicy::LastWins => {
                    log::warn!(
                        "sample {} from {} replaced by {}",
                        name,
                        samples[idx].path.display(),
                        path.display()
                    );
                    samples[idx].path = path;
                }
            },
            None => {
                seen.insert(name.clone(), samples.len());
                samples.push(SampleFile { name, path });
            }
        }
    }

    if samples.is_empty() {
        return Err(DiscoveryError::NoSequenceFiles { dir: root });
    }
    log::debug!("located {} sequence files in {}", samples.len(), root.display());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), ">c\nACGT\n").unwrap();
    }

    #[test]
    fn sample_name_strips_supported_extensions() {
        assert_eq!(sample_name(Path::new("/x/normal.fasta")).as_deref(), Some("normal"));
        assert_eq!(sample_name(Path::new("a.fa")).as_deref(), Some("a"));
        assert_eq!(sample_name(Path::new("a.b.fas")).as_deref(), Some("a.b"));
        assert_eq!(sample_name(Path::new("a.fa.gz")).as_deref(), Some("a"));
    }

    #[test]
    fn sample_name_rejects_other_variants() {
        for name in ["a.fsa", "a.fna", "a.faa", "a.tfa", "a.FA", "a.gz", "fasta", ".fa", "a.csv"] {
            assert_eq!(sample_name(Path::new(name)), None, "{name}");
        }
    }

    #[test]
    fn locate_sorts_and_filters() {
        let dir = TempDir::new().unwrap();
        for name in ["b.fasta", "a.fa", "c.fas", "d.fsa", "notes.txt", "extracted_features.csv"] {
            touch(&dir, name);
        }
        fs::create_dir(dir.path().join("nested.fa")).unwrap();

        let found = locate(dir.path(), DuplicatePolicy::Reject).unwrap();
        let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(found.iter().all(|s| s.path.is_absolute()));
    }

    #[test]
    fn locate_empty_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "only.fsa");
        let err = locate(dir.path(), DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, DiscoveryError::NoSequenceFiles { .. }));
    }

    #[test]
    fn locate_missing_dir_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let err = locate(&dir.path().join("missing"), DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, DiscoveryError::Unreadable { .. }));
    }

    #[test]
    fn duplicate_sample_rejected_by_default() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "x.fa");
        touch(&dir, "x.fasta");
        match locate(dir.path(), DuplicatePolicy::Reject).unwrap_err() {
            DiscoveryError::DuplicateSample { sample, first, second } => {
                assert_eq!(sample, "x");
                assert!(first.ends_with("x.fa"));
                assert!(second.ends_with("x.fasta"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_sample_last_wins_keeps_position() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "x.fa");
        touch(&dir, "x.fasta");
        touch(&dir, "y.fa");
        let found = locate(dir.path(), DuplicatePolicy::LastWins).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "x");
        assert!(found[0].path.ends_with("x.fasta"));
        assert_eq!(found[1].name, "y");
    }
}
