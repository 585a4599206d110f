//! Assembly-quality feature extraction for genome FASTA files.
//!
//! [`extract`] locates the sequence files of a directory, computes contig
//! length, GC% and N/L statistics per sample, and writes
//! `extracted_features.csv` for the downstream Pass/Fail/Reference
//! classifier.

pub mod core;
pub mod report;
mod simd;

pub use crate::core::engine::{
    CacheMode, ExtractConfig, Extraction, ReportStatus, SampleFailure, extract,
};
pub use crate::core::error::{DiscoveryError, ExtractError, ParseError, ReportError};
pub use crate::core::locate::DuplicatePolicy;
pub use crate::core::model::{Feature, FeatureSchema, SampleMetrics, SampleTable};
