//! Sign combination catalog entries

use serde::{Deserialize, Serialize};

/// Directional lean of a combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComboLean {
    Yes,
    No,
    Wait,
    Neutral,
}

impl std::fmt::Display for ComboLean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComboLean::Yes => "yes",
            ComboLean::No => "no",
            ComboLean::Wait => "wait",
            ComboLean::Neutral => "neutral",
        };
        write!(f, "{}", name)
    }
}

/// Multi-sign co-occurrence pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignCombination {
    pub name: String,
    /// Trigger fragments; every one must be found in some user sign
    pub signs: Vec<String>,
    pub meaning: String,
    pub verdict_lean: ComboLean,
    /// 1-5, ranking and lean weight
    pub power_level: u8,
}

/// Aggregate lean of all matched combinations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinationLean {
    pub lean: ComboLean,
    /// 0-100
    pub confidence: f64,
}

impl CombinationLean {
    /// No combinations matched
    pub fn none() -> Self {
        Self {
            lean: ComboLean::Neutral,
            confidence: 0.0,
        }
    }
}
