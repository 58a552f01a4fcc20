//! Run configuration. Defaults reproduce the fixed file names and offset.

use crate::data::DEFAULT_SKIP_ROWS;
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "raw_data.xlsx";
pub const DEFAULT_OUTPUT: &str = "cleaned_credit_cards.csv";

/// Settings for one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Intro rows above the header
    pub skip_rows: usize,
    /// Worksheet to read; the first one when unset
    pub sheet: Option<String>,
    /// Optional JSON summary destination
    pub summary: Option<PathBuf>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            skip_rows: DEFAULT_SKIP_ROWS,
            sheet: None,
            summary: None,
        }
    }
}
