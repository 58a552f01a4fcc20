//! Stats module - extract summary

mod summary;

pub use summary::ExtractSummary;
