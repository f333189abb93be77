//! Data file locations.
//!
//! # Invariants
//! - The core never reads environment variables; shells resolve paths and
//!   hand a finished `StoreConfig` in.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const BOOKS_FILE_NAME: &str = "books.txt";
pub const LOANS_FILE_NAME: &str = "loans.txt";

/// Paths of the two record files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub books_file: PathBuf,
    pub loans_file: PathBuf,
}

impl StoreConfig {
    /// Places both files under `data_dir` using the standard file names.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            books_file: data_dir.join(BOOKS_FILE_NAME),
            loans_file: data_dir.join(LOANS_FILE_NAME),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}
