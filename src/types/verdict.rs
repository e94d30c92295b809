//! Weight, sufficiency and verdict types

use serde::{Deserialize, Serialize};

/// Scored totals across a sign set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightSummary {
    pub positive_score: u32,
    pub negative_score: u32,
    pub wait_score: u32,
    /// Neutral signs are counted, never scored
    pub neutral_count: u32,
    /// positive + negative + wait
    pub total_weight: u32,
}

impl WeightSummary {
    /// Share of total weight, 0 when nothing was scored
    pub fn percent(&self, score: u32) -> f64 {
        if self.total_weight == 0 {
            0.0
        } else {
            score as f64 / self.total_weight as f64 * 100.0
        }
    }
}

/// How much the sign set can support a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SufficiencyLevel {
    Low,
    Medium,
    High,
}

/// Result of the insufficient-data check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignCheck {
    pub sufficient: bool,
    pub confidence: SufficiencyLevel,
    pub reason: String,
}

/// Directional conclusion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lean {
    Yes,
    No,
    Wait,
    Insufficient,
}

impl Lean {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lean::Yes => "yes",
            Lean::No => "no",
            Lean::Wait => "wait",
            Lean::Insufficient => "insufficient",
        }
    }

    /// Word the verdict must open with, None when no verdict may be forced
    pub fn verdict_word(&self) -> Option<&'static str> {
        match self {
            Lean::Yes => Some("YES"),
            Lean::No => Some("NO"),
            Lean::Wait => Some("WAIT"),
            Lean::Insufficient => None,
        }
    }

    /// Canned verdict used when generator output is unusable
    pub fn fallback_verdict(&self) -> &'static str {
        match self {
            Lean::Yes => "YES — The path is opening",
            Lean::No => "NO — The universe urges caution",
            Lean::Wait => "WAIT — Clarity is still forming",
            Lean::Insufficient => "The universe needs more signs",
        }
    }
}

impl std::fmt::Display for Lean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which lean rule fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum LeanRule {
    /// Sufficiency check failed
    L100_INSUFFICIENT,
    /// Mostly neutral, little weight
    L200_AMBIGUOUS,
    /// Negative dominance
    L300_NEGATIVE,
    /// Positive dominance
    L400_POSITIVE,
    /// Timing signs or mixed signals
    L500_TIMING_OR_MIXED,
    /// Positive outweighs negative without dominating
    L600_LEANS_POSITIVE,
    /// Nothing clear
    L700_UNCLEAR,
}

impl LeanRule {
    pub fn code(&self) -> &'static str {
        match self {
            Self::L100_INSUFFICIENT => "L100_INSUFFICIENT",
            Self::L200_AMBIGUOUS => "L200_AMBIGUOUS",
            Self::L300_NEGATIVE => "L300_NEGATIVE",
            Self::L400_POSITIVE => "L400_POSITIVE",
            Self::L500_TIMING_OR_MIXED => "L500_TIMING_OR_MIXED",
            Self::L600_LEANS_POSITIVE => "L600_LEANS_POSITIVE",
            Self::L700_UNCLEAR => "L700_UNCLEAR",
        }
    }

    /// Reasoning handed to the reading
    pub fn description(&self) -> &'static str {
        match self {
            Self::L100_INSUFFICIENT => "Not enough signal.",
            Self::L200_AMBIGUOUS => "The signs are ambiguous. The universe is not yet ready to give a clear answer.",
            Self::L300_NEGATIVE => "The signs carry clear warnings. The universe is advising against this path.",
            Self::L400_POSITIVE => "The signs align positively. The universe is giving its blessing.",
            Self::L500_TIMING_OR_MIXED => "The signs suggest the timing is not yet right, or the situation needs more clarity.",
            Self::L600_LEANS_POSITIVE => "The signs lean positive, though the message could be clearer with more signs.",
            Self::L700_UNCLEAR => "The universe has not yet formed a clear answer. Continue watching for signs.",
        }
    }
}

/// Lean computed from sign weights alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictLean {
    pub lean: Lean,
    /// 0-100
    pub confidence: f64,
    pub rule: LeanRule,
    pub reasoning: String,
}

/// Final lean after combinations were merged in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedVerdict {
    pub final_lean: Lean,
    /// 0-100
    pub final_confidence: f64,
    /// True when a combination changed the lean or raised confidence
    pub combination_applied: bool,
}

impl ResolvedVerdict {
    /// No direction: too few signs to answer
    pub fn insufficient() -> Self {
        Self {
            final_lean: Lean::Insufficient,
            final_confidence: 0.0,
            combination_applied: false,
        }
    }
}
