//! Combination Detector: predefined multi-sign patterns and their lean

use std::sync::Arc;
use lazy_static::lazy_static;

use crate::core::matcher::{MatchStrategy, SubstringMatch};
use crate::types::{ComboLean, CombinationLean, SignCombination};

lazy_static! {
    static ref BUILTIN_COMBINATIONS: Vec<SignCombination> =
        serde_json::from_str(include_str!("../../data/sign_combinations.json"))
            .expect("data/sign_combinations.json is valid");
}

/// Read-only combination catalog
#[derive(Debug, Clone)]
pub struct CombinationCatalog {
    combinations: Vec<SignCombination>,
    matcher: Arc<dyn MatchStrategy>,
}

impl Default for CombinationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CombinationCatalog {
    pub fn builtin() -> Self {
        Self::from_combinations(BUILTIN_COMBINATIONS.clone())
    }

    pub fn from_combinations(combinations: Vec<SignCombination>) -> Self {
        Self {
            combinations,
            matcher: Arc::new(SubstringMatch),
        }
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn MatchStrategy>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn combinations(&self) -> &[SignCombination] {
        &self.combinations
    }

    /// All combinations whose every trigger occurs in some user sign,
    /// strongest first (catalog order among equal power)
    pub fn find_matches(&self, signs: &[String]) -> Vec<SignCombination> {
        let signs_lower: Vec<String> = signs.iter().map(|s| s.to_lowercase()).collect();

        let mut matches: Vec<SignCombination> = self
            .combinations
            .iter()
            .filter(|combo| {
                combo.signs.iter().all(|trigger| {
                    signs_lower
                        .iter()
                        .any(|sign| self.matcher.contains_lower(sign, trigger))
                })
            })
            .cloned()
            .collect();

        // sort_by is stable
        matches.sort_by(|a, b| b.power_level.cmp(&a.power_level));
        matches
    }
}

/// Power-weighted lean over matched combinations
///
/// Ties between buckets go yes, then no, then wait. When only neutral
/// combinations matched the lean stays neutral with confidence 0.
pub fn combination_lean(matches: &[SignCombination]) -> CombinationLean {
    if matches.is_empty() {
        return CombinationLean::none();
    }

    let mut yes = 0u32;
    let mut no = 0u32;
    let mut wait = 0u32;

    for combo in matches {
        let weight = combo.power_level as u32;
        match combo.verdict_lean {
            ComboLean::Yes => yes += weight,
            ComboLean::No => no += weight,
            ComboLean::Wait => wait += weight,
            ComboLean::Neutral => {}
        }
    }

    let total = yes + no + wait;
    if total == 0 {
        return CombinationLean::none();
    }

    let max = yes.max(no).max(wait);
    let lean = if max == yes {
        ComboLean::Yes
    } else if max == no {
        ComboLean::No
    } else {
        ComboLean::Wait
    };

    CombinationLean {
        lean,
        confidence: (max as f64 / total as f64 * 100.0).round(),
    }
}
