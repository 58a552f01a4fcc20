//! Data module - listing loading, classification and CSV output

mod loader;
pub mod processor;
mod record;
mod writer;

pub use loader::{cell_text, DataLoader, LoaderError, DEFAULT_SKIP_ROWS};
pub use processor::{DataProcessor, ProcessorError, OUTPUT_COLUMNS, REQUIRED_COLUMNS};
pub use record::{any_cell_mentions, CardRecord, RewardType};
pub use writer::{ExtractWriter, StagedFile, WriterError};
