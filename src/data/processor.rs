//! Data Processor Module
//! Classifies each card row and projects the listing to the extract columns.

use super::record::{any_cell_mentions, CardRecord, RewardType};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

pub const INSTITUTION_NAME: &str = "Institution Name";
pub const PRODUCT_NAME: &str = "Product Name";
pub const STATE: &str = "State";
pub const ANNUAL_FEE: &str = "Annual Fee";
pub const REWARDS: &str = "Rewards";
pub const IS_STUDENT: &str = "is_student";
pub const ACCEPTS_ITIN: &str = "accepts_itin";
pub const REWARD_TYPE: &str = "Reward_Type";

/// Columns that must be present in the loaded listing.
pub const REQUIRED_COLUMNS: [&str; 5] = [INSTITUTION_NAME, PRODUCT_NAME, STATE, ANNUAL_FEE, REWARDS];

/// Columns of the extract, in output order.
pub const OUTPUT_COLUMNS: [&str; 8] = [
    INSTITUTION_NAME,
    PRODUCT_NAME,
    STATE,
    ANNUAL_FEE,
    REWARDS,
    IS_STUDENT,
    ACCEPTS_ITIN,
    REWARD_TYPE,
];

const STUDENT_NEEDLE: &str = "student";
const ITIN_NEEDLE: &str = "itin";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Handles classification and projection of the card listing.
pub struct DataProcessor;

impl DataProcessor {
    /// Fail with every required column the listing lacks.
    pub fn check_schema(df: &DataFrame) -> Result<(), ProcessorError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !present.iter().any(|p| p.as_str() == **name))
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProcessorError::MissingColumns(missing))
        }
    }

    /// Classify every row of the listing. One record per input row.
    pub fn classify(df: &DataFrame) -> Result<Vec<CardRecord>, ProcessorError> {
        Self::check_schema(df)?;

        // Every cell is scanned as text, so cast all columns up front
        let text_columns: Vec<Column> = df
            .get_columns()
            .iter()
            .map(|col| col.cast(&DataType::String))
            .collect::<PolarsResult<_>>()?;
        let cells: Vec<&StringChunked> = text_columns
            .iter()
            .map(|col| col.str())
            .collect::<PolarsResult<_>>()?;

        let field = |name: &str| -> PolarsResult<StringChunked> {
            Ok(df.column(name)?.cast(&DataType::String)?.str()?.clone())
        };
        let institution = field(INSTITUTION_NAME)?;
        let product = field(PRODUCT_NAME)?;
        let state = field(STATE)?;
        let annual_fee = field(ANNUAL_FEE)?;
        let rewards = field(REWARDS)?;

        let owned = |ca: &StringChunked, i: usize| ca.get(i).map(str::to_string);

        let records: Vec<CardRecord> = (0..df.height())
            .map(|i| {
                let row = || cells.iter().map(move |col| col.get(i));
                let rewards_text = rewards.get(i);
                CardRecord {
                    institution_name: owned(&institution, i),
                    product_name: owned(&product, i),
                    state: owned(&state, i),
                    annual_fee: owned(&annual_fee, i),
                    rewards: rewards_text.map(str::to_string),
                    is_student: any_cell_mentions(row(), STUDENT_NEEDLE),
                    accepts_itin: any_cell_mentions(row(), ITIN_NEEDLE),
                    reward_type: RewardType::classify(rewards_text),
                }
            })
            .collect();

        debug!(rows = records.len(), "classified listing");
        Ok(records)
    }

    /// Build the extract DataFrame from classified records.
    ///
    /// Output columns: [`OUTPUT_COLUMNS`]
    pub fn to_frame(records: &[CardRecord]) -> Result<DataFrame, ProcessorError> {
        let text = |get: fn(&CardRecord) -> &Option<String>| -> Vec<Option<String>> {
            records.iter().map(|r| get(r).clone()).collect()
        };

        let institutions = text(|r| &r.institution_name);
        let products = text(|r| &r.product_name);
        let states = text(|r| &r.state);
        let fees = text(|r| &r.annual_fee);
        let rewards = text(|r| &r.rewards);
        let students: Vec<bool> = records.iter().map(|r| r.is_student).collect();
        let itins: Vec<bool> = records.iter().map(|r| r.accepts_itin).collect();
        let reward_types: Vec<&str> = records.iter().map(|r| r.reward_type.as_str()).collect();

        let df = DataFrame::new(vec![
            Column::new(INSTITUTION_NAME.into(), institutions),
            Column::new(PRODUCT_NAME.into(), products),
            Column::new(STATE.into(), states),
            Column::new(ANNUAL_FEE.into(), fees),
            Column::new(REWARDS.into(), rewards),
            Column::new(IS_STUDENT.into(), students),
            Column::new(ACCEPTS_ITIN.into(), itins),
            Column::new(REWARD_TYPE.into(), reward_types),
        ])?;

        Ok(df)
    }

    /// Classify and project in one step.
    pub fn transform(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let records = Self::classify(df)?;
        Self::to_frame(&records)
    }
}
