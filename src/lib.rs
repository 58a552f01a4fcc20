//! Card Extract: classifies credit card listings for the card browser.
//!
//! Reads the published listing spreadsheet, flags student and ITIN cards,
//! labels each card's reward type and writes a flat CSV extract.

pub mod cli;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod stats;

pub use cli::Args;
pub use config::ExtractConfig;
pub use data::{CardRecord, DataLoader, DataProcessor, ExtractWriter, RewardType};
pub use pipeline::{Pipeline, PipelineError, RunReport, Stage};
pub use stats::ExtractSummary;
