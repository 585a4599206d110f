pub mod csv;

use std::path::{Path, PathBuf};

pub const REPORT_FILE_NAME: &str = "extracted_features.csv";

pub fn report_path(dir: &Path) -> PathBuf {
    dir.join(REPORT_FILE_NAME)
}
