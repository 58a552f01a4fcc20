//! Command-line interface definitions and argument parsing

use crate::config::{ExtractConfig, DEFAULT_INPUT, DEFAULT_OUTPUT};
use crate::data::DEFAULT_SKIP_ROWS;
use clap::Parser;
use std::path::PathBuf;

/// Extract classified credit card listings for the card browser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the listing spreadsheet (.xlsx, .xls, .ods or .csv)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Path of the CSV extract to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Number of intro rows above the header row
    #[arg(long, default_value_t = DEFAULT_SKIP_ROWS)]
    pub skip_rows: usize,

    /// Worksheet to read (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Also write a JSON summary of the extract to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn to_config(&self) -> ExtractConfig {
        ExtractConfig {
            input: self.input.clone(),
            output: self.output.clone(),
            skip_rows: self.skip_rows,
            sheet: self.sheet.clone(),
            summary: self.summary.clone(),
        }
    }
}
