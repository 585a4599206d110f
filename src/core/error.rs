use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no sequence files (*.fa, *.fas, *.fasta) found in {}", .dir.display())]
    NoSequenceFiles { dir: PathBuf },

    #[error(
        "sample `{sample}` is provided by both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateSample {
        sample: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("failed to read directory {}", .dir.display())]
    Unreadable {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to turn one file into contigs. Always names the file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {reason}", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        reason: SyntaxIssue,
    },
}

impl ParseError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ParseError::Io { path, .. } | ParseError::Syntax { path, .. } => path,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SyntaxIssue {
    #[error("sequence data before the first '>' header")]
    MissingHeader,
    #[error("header line has no contig name")]
    EmptyName,
    #[error("invalid sequence byte 0x{0:02x}")]
    InvalidByte(u8),
    #[error("duplicate contig name `{0}`")]
    DuplicateContig(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read report {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: unrecognised header `{header}`", .path.display())]
    Header { path: PathBuf, header: String },

    #[error("{}:{line}: {reason}", .path.display())]
    Row {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Errors that abort a whole extraction call.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("worker pool failed: {0}")]
    Pool(String),
}
