//! Card Record Module
//! Typed row produced by the classifier, plus the reward category.

use serde::Serialize;
use std::fmt;

/// Text used in place of a missing rewards description before classification.
pub const MISSING_REWARDS_TEXT: &str = "None";

/// Reward category shown as a filter in the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RewardType {
    Cashback,
    Travel,
    General,
}

impl RewardType {
    pub const ALL: [RewardType; 3] = [
        RewardType::Cashback,
        RewardType::Travel,
        RewardType::General,
    ];

    /// Classify a rewards description.
    ///
    /// Matching is case-sensitive: "Cashback" wins over "Travel", anything
    /// else (including a missing value) is `General`.
    pub fn classify(rewards: Option<&str>) -> Self {
        let text = rewards.unwrap_or(MISSING_REWARDS_TEXT);
        if text.contains("Cashback") {
            RewardType::Cashback
        } else if text.contains("Travel") {
            RewardType::Travel
        } else {
            RewardType::General
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RewardType::Cashback => "Cashback",
            RewardType::Travel => "Travel",
            RewardType::General => "General",
        }
    }
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One card product after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    pub institution_name: Option<String>,
    pub product_name: Option<String>,
    pub state: Option<String>,
    pub annual_fee: Option<String>,
    pub rewards: Option<String>,
    pub is_student: bool,
    pub accepts_itin: bool,
    pub reward_type: RewardType,
}

/// Case-insensitive substring scan over a row's cell texts.
///
/// `needle` must already be lowercase. Missing cells scan as empty text.
pub fn any_cell_mentions<'a, I>(cells: I, needle: &str) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    cells
        .into_iter()
        .any(|cell| cell.unwrap_or("").to_lowercase().contains(needle))
}
