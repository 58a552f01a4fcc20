//! Extraction pipeline: load → classify → write, run once.

use crate::config::ExtractConfig;
use crate::data::{
    DataLoader, DataProcessor, ExtractWriter, LoaderError, ProcessorError, WriterError,
};
use crate::stats::ExtractSummary;
use polars::prelude::PolarsError;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, warn};

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Loaded,
    Transformed,
    Written,
    Failed,
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Could not find '{}'. Check that the file is in the working directory.", .0.display())]
    InputNotFound(PathBuf),
    #[error("Failed to read input: {0}")]
    InputParse(#[source] LoaderError),
    #[error("Unexpected listing layout: {0}")]
    Schema(#[from] ProcessorError),
    #[error("{0}")]
    OutputWrite(#[from] WriterError),
    #[error("Failed to summarize extract: {0}")]
    Summary(#[source] PolarsError),
    #[error("Pipeline already ran (stage: {0:?})")]
    AlreadyRun(Stage),
}

impl From<LoaderError> for PipelineError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::NotFound(path) => PipelineError::InputNotFound(path),
            other => PipelineError::InputParse(other),
        }
    }
}

impl PipelineError {
    /// Process exit status for this failure class.
    pub fn exit_status(&self) -> u8 {
        match self {
            PipelineError::AlreadyRun(_) => 1,
            PipelineError::InputNotFound(_) => 2,
            PipelineError::InputParse(_) => 3,
            PipelineError::Schema(_) => 4,
            PipelineError::OutputWrite(_) => 5,
            PipelineError::Summary(_) => 6,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output: PathBuf,
    pub summary: ExtractSummary,
}

/// Single-shot extraction run.
pub struct Pipeline {
    config: ExtractConfig,
    stage: Stage,
}

impl Pipeline {
    pub fn new(config: ExtractConfig) -> Self {
        Self {
            config,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Run every stage. Any failure leaves the pipeline in `Failed`.
    pub fn run(&mut self) -> Result<RunReport, PipelineError> {
        if self.stage != Stage::Idle {
            return Err(PipelineError::AlreadyRun(self.stage));
        }

        let result = self.run_stages();
        if let Err(err) = &result {
            warn!(stage = ?self.stage, error = %err, "extraction failed");
            self.stage = Stage::Failed;
        }
        result
    }

    fn run_stages(&mut self) -> Result<RunReport, PipelineError> {
        let config = self.config.clone();

        println!("Reading '{}'...", config.input.display());
        let listing = DataLoader::new(config.skip_rows)
            .with_sheet(config.sheet.clone())
            .load(&config.input)?;
        self.advance(Stage::Loaded);
        println!(
            "Loaded {} rows, {} columns",
            listing.height(),
            listing.width()
        );

        println!("Classifying cards...");
        let mut extract = DataProcessor::transform(&listing)?;
        self.advance(Stage::Transformed);

        let summary = ExtractSummary::from_frame(&extract).map_err(PipelineError::Summary)?;

        // Stage every output before renaming any, so a failure leaves the
        // previous files in place. The extract is committed last.
        let staged_summary = config
            .summary
            .as_deref()
            .map(|path| ExtractWriter::stage_json(&summary, path))
            .transpose()?;
        let staged_extract = ExtractWriter::stage_csv(&mut extract, &config.output)?;
        if let Some(staged) = staged_summary {
            staged.commit()?;
        }
        staged_extract.commit()?;
        self.advance(Stage::Written);

        Ok(RunReport {
            output: config.output,
            summary,
        })
    }

    fn advance(&mut self, next: Stage) {
        debug!(from = ?self.stage, to = ?next, "stage");
        self.stage = next;
    }
}
