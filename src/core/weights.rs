//! Weight Aggregator: per-sign scores, sufficiency gate and weighted lean
//!
//! Rule order in `determine_lean` is significant: negative dominance is
//! checked before positive dominance.

use crate::core::sign_table::SignTable;
use crate::types::{
    Lean, LeanRule, SignCheck, SufficiencyLevel, VerdictLean, VerdictWeight, WeightSummary,
};
use crate::{
    AMBIGUOUS_CONFIDENCE, AMBIGUOUS_MAX_WEIGHT, FALLBACK_WAIT_CONFIDENCE,
    HIGH_CONFIDENCE_SIGN_COUNT, LEAN_YES_CONFIDENCE_BASE, LEAN_YES_CONFIDENCE_CAP,
    LEAN_YES_CONFIDENCE_SLOPE, MIN_SIGNS_INSUFFICIENT, NO_HARD_SCORE, NO_MAJORITY_PERCENT,
    NO_MAJORITY_SCORE, STRONG_CONFIDENCE_BASE, STRONG_CONFIDENCE_CAP, STRONG_CONFIDENCE_SLOPE,
    TWO_SIGN_MIN_WEIGHT, WAIT_CONFIDENCE_BASE, WAIT_CONFIDENCE_CAP, WAIT_CONFIDENCE_SLOPE,
    WAIT_PERCENT, YES_MIN_SCORE, YES_PERCENT,
};

/// Aggregates sign weights over one meaning table
#[derive(Debug, Clone, Copy)]
pub struct WeightAggregator<'a> {
    table: &'a SignTable,
}

impl<'a> WeightAggregator<'a> {
    pub fn new(table: &'a SignTable) -> Self {
        Self { table }
    }

    /// Sum weight strengths per category; neutral signs are only counted
    pub fn calculate_weights(&self, signs: &[String]) -> WeightSummary {
        let mut summary = WeightSummary::default();

        for sign in signs {
            let meaning = self.table.lookup(sign);
            let strength = meaning.weight_strength as u32;
            match meaning.verdict_weight {
                VerdictWeight::Positive => summary.positive_score += strength,
                VerdictWeight::Negative => summary.negative_score += strength,
                VerdictWeight::Wait => summary.wait_score += strength,
                VerdictWeight::Neutral => summary.neutral_count += 1,
            }
        }

        summary.total_weight = summary.positive_score + summary.negative_score + summary.wait_score;
        summary
    }

    /// Insufficient-data gate
    pub fn sufficiency(&self, signs: &[String]) -> SignCheck {
        let weights = self.calculate_weights(signs);
        sufficiency_for(signs.len(), &weights)
    }

    /// Lean from sign weights alone
    pub fn determine_lean(&self, signs: &[String]) -> VerdictLean {
        let weights = self.calculate_weights(signs);
        let check = sufficiency_for(signs.len(), &weights);
        lean_for(signs.len(), &weights, &check)
    }
}

/// Sufficiency from a sign count and its precomputed weights
pub fn sufficiency_for(count: usize, weights: &WeightSummary) -> SignCheck {
    if count <= MIN_SIGNS_INSUFFICIENT {
        return SignCheck {
            sufficient: false,
            confidence: SufficiencyLevel::Low,
            reason: "Not enough signal. One sign is not enough for the universe to speak clearly. The Orakl needs more signs to give you a meaningful answer.".to_string(),
        };
    }

    if count == 2 && weights.total_weight < TWO_SIGN_MIN_WEIGHT {
        return SignCheck {
            sufficient: false,
            confidence: SufficiencyLevel::Low,
            reason: "Not enough signal. Two signs give only a whisper from the universe. Keep watching for more signs or consider a 5-day Deep Reading.".to_string(),
        };
    }

    if count >= HIGH_CONFIDENCE_SIGN_COUNT {
        return SignCheck {
            sufficient: true,
            confidence: SufficiencyLevel::High,
            reason: "The universe has spoken clearly through multiple signs. A confident reading is possible.".to_string(),
        };
    }

    if count >= 3 {
        return SignCheck {
            sufficient: true,
            confidence: SufficiencyLevel::Medium,
            reason: "The universe is beginning to form a message. A reading is possible, though more signs would strengthen the clarity.".to_string(),
        };
    }

    SignCheck {
        sufficient: true,
        confidence: SufficiencyLevel::Medium,
        reason: "Sufficient signs for a reading.".to_string(),
    }
}

/// Weighted lean given precomputed weights and sufficiency
pub fn lean_for(count: usize, weights: &WeightSummary, check: &SignCheck) -> VerdictLean {
    if !check.sufficient {
        return VerdictLean {
            lean: Lean::Insufficient,
            confidence: 0.0,
            rule: LeanRule::L100_INSUFFICIENT,
            reasoning: check.reason.clone(),
        };
    }

    // neutral signs are a strict majority
    if weights.neutral_count as usize * 2 > count && weights.total_weight < AMBIGUOUS_MAX_WEIGHT {
        return verdict(Lean::Wait, AMBIGUOUS_CONFIDENCE, LeanRule::L200_AMBIGUOUS);
    }

    let positive_percent = weights.percent(weights.positive_score);
    let negative_percent = weights.percent(weights.negative_score);
    let wait_percent = weights.percent(weights.wait_score);

    if weights.negative_score >= NO_HARD_SCORE
        || (negative_percent > NO_MAJORITY_PERCENT && weights.negative_score >= NO_MAJORITY_SCORE)
    {
        let confidence = STRONG_CONFIDENCE_CAP
            .min(STRONG_CONFIDENCE_BASE + negative_percent * STRONG_CONFIDENCE_SLOPE);
        return verdict(Lean::No, confidence, LeanRule::L300_NEGATIVE);
    }

    if positive_percent > YES_PERCENT && weights.positive_score >= YES_MIN_SCORE {
        let confidence = STRONG_CONFIDENCE_CAP
            .min(STRONG_CONFIDENCE_BASE + positive_percent * STRONG_CONFIDENCE_SLOPE);
        return verdict(Lean::Yes, confidence, LeanRule::L400_POSITIVE);
    }

    if wait_percent > WAIT_PERCENT || (weights.positive_score > 0 && weights.negative_score > 0) {
        let confidence =
            WAIT_CONFIDENCE_CAP.min(WAIT_CONFIDENCE_BASE + wait_percent * WAIT_CONFIDENCE_SLOPE);
        return verdict(Lean::Wait, confidence, LeanRule::L500_TIMING_OR_MIXED);
    }

    if weights.positive_score > weights.negative_score {
        let confidence = LEAN_YES_CONFIDENCE_CAP.min(
            LEAN_YES_CONFIDENCE_BASE
                + (positive_percent - negative_percent) * LEAN_YES_CONFIDENCE_SLOPE,
        );
        return verdict(Lean::Yes, confidence, LeanRule::L600_LEANS_POSITIVE);
    }

    verdict(Lean::Wait, FALLBACK_WAIT_CONFIDENCE, LeanRule::L700_UNCLEAR)
}

fn verdict(lean: Lean, confidence: f64, rule: LeanRule) -> VerdictLean {
    VerdictLean {
        lean,
        confidence: confidence.clamp(0.0, 100.0),
        rule,
        reasoning: rule.description().to_string(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
