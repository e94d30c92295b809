//! Deep Reading journey and sign catalog types

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// A 5-day Deep Reading in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    pub id: String,
    pub email: String,
    pub question: String,
    pub start_date: DateTime<Utc>,
    /// 1-5
    pub current_day: u8,
    /// Day number → signs logged that day
    pub daily_signs: BTreeMap<u8, Vec<String>>,
    pub completed: bool,
    pub reading_text: Option<String>,
    pub verdict: Option<String>,
}

impl Journey {
    /// All logged signs, flattened in day order
    pub fn all_signs(&self) -> Vec<String> {
        self.daily_signs.values().flatten().cloned().collect()
    }

    pub fn signs_logged(&self) -> usize {
        self.daily_signs.values().map(Vec::len).sum()
    }
}

/// Partial update, unset fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JourneyPatch {
    pub daily_signs: Option<BTreeMap<u8, Vec<String>>>,
    pub current_day: Option<u8>,
    pub completed: Option<bool>,
    pub reading_text: Option<String>,
    pub verdict: Option<String>,
}

/// Which product tier a catalog category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Quick,
    Deep,
}

/// Group of canonical signs offered in the picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignCategory {
    pub id: String,
    pub title: String,
    pub tier: Tier,
    pub signs: Vec<String>,
}
