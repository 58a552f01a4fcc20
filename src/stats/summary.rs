//! Extract Summary Module
//! Counts over the finished extract, reported after each run.

use crate::data::processor::{ACCEPTS_ITIN, ANNUAL_FEE, IS_STUDENT, REWARD_TYPE};
use crate::data::RewardType;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// Annual fee texts the front end treats as "no fee". Missing also counts.
pub const ZERO_FEE_TEXTS: [&str; 2] = ["$0", "0"];

/// Headline numbers for one extract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    pub total_rows: usize,
    pub student_cards: usize,
    pub itin_cards: usize,
    pub zero_fee_cards: usize,
    pub reward_types: BTreeMap<RewardType, usize>,
}

impl ExtractSummary {
    /// Compute the summary from an extract frame.
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Self> {
        let count = |predicate: Expr| -> PolarsResult<usize> {
            Ok(df.clone().lazy().filter(predicate).collect()?.height())
        };

        let zero_fee = ZERO_FEE_TEXTS
            .iter()
            .fold(col(ANNUAL_FEE).is_null(), |acc, text| {
                acc.or(col(ANNUAL_FEE).eq(lit(*text)))
            });

        let mut reward_types = BTreeMap::new();
        for reward_type in RewardType::ALL {
            let n = count(col(REWARD_TYPE).eq(lit(reward_type.as_str())))?;
            reward_types.insert(reward_type, n);
        }

        Ok(Self {
            total_rows: df.height(),
            student_cards: count(col(IS_STUDENT))?,
            itin_cards: count(col(ACCEPTS_ITIN))?,
            zero_fee_cards: count(zero_fee)?,
            reward_types,
        })
    }

    /// Human-readable report lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("  Cards:          {}", self.total_rows),
            format!("  Student cards:  {}", self.student_cards),
            format!("  ITIN accepted:  {}", self.itin_cards),
            format!("  No annual fee:  {}", self.zero_fee_cards),
        ];
        for (reward_type, n) in &self.reward_types {
            lines.push(format!("  {:<14}  {}", format!("{}:", reward_type), n));
        }
        lines
    }
}
