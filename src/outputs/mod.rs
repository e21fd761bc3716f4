//! Digest rendering and file outputs.
//!
//! # Submodules
//!
//! - [`digest`]: Renders processed articles into the digest report and counts
//! - [`text`]: Writes the report as a UTF-8 text file
//! - [`json`]: Writes the report metadata and articles as JSON
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── news_digest_20250506.txt
//! └── news_digest_20250506.json
//! ```

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub mod digest;
pub mod json;
pub mod text;

/// `{output_dir}/news_digest_{YYYYMMDD}.{ext}`
pub fn dated_path(output_dir: &str, date: NaiveDate, ext: &str) -> PathBuf {
    Path::new(output_dir).join(format!("news_digest_{}.{ext}", date.format("%Y%m%d")))
}
