//! Verdict Resolver: merge the weighted lean with the combination lean
//!
//! Combinations only act when at least one matched and their confidence is
//! above the override threshold. A `no` combination always wins.

use crate::types::{ComboLean, CombinationLean, Lean, ResolvedVerdict, SignCombination, VerdictLean};
use crate::COMBINATION_OVERRIDE_CONFIDENCE;

/// Pure merge of both leans
pub fn resolve(
    weight_lean: &VerdictLean,
    matches: &[SignCombination],
    combo: &CombinationLean,
) -> ResolvedVerdict {
    let mut final_lean = weight_lean.lean;
    let mut final_confidence = weight_lean.confidence;
    let mut combination_applied = false;

    if !matches.is_empty() && combo.confidence > COMBINATION_OVERRIDE_CONFIDENCE {
        let overridden = match combo.lean {
            ComboLean::Yes if weight_lean.lean != Lean::No => Some(Lean::Yes),
            ComboLean::No => Some(Lean::No),
            ComboLean::Wait => Some(Lean::Wait),
            _ => None,
        };

        if let Some(lean) = overridden {
            final_lean = lean;
            final_confidence = final_confidence.max(combo.confidence);
            combination_applied = true;
        }
    }

    ResolvedVerdict {
        final_lean,
        final_confidence: final_confidence.clamp(0.0, 100.0),
        combination_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LeanRule;

    fn weight(lean: Lean, confidence: f64) -> VerdictLean {
        VerdictLean {
            lean,
            confidence,
            rule: LeanRule::L700_UNCLEAR,
            reasoning: String::new(),
        }
    }

    fn matched(lean: ComboLean) -> Vec<SignCombination> {
        vec![SignCombination {
            name: "test".to_string(),
            signs: vec!["x".to_string()],
            meaning: String::new(),
            verdict_lean: lean,
            power_level: 4,
        }]
    }

    fn combo(lean: ComboLean, confidence: f64) -> CombinationLean {
        CombinationLean { lean, confidence }
    }

    #[test]
    fn test_no_matches_keeps_weight_lean() {
        let r = resolve(&weight(Lean::Yes, 70.0), &[], &CombinationLean::none());
        assert_eq!(r.final_lean, Lean::Yes);
        assert_eq!(r.final_confidence, 70.0);
        assert!(!r.combination_applied);
    }

    #[test]
    fn test_low_confidence_combo_ignored() {
        let r = resolve(
            &weight(Lean::Yes, 70.0),
            &matched(ComboLean::No),
            &combo(ComboLean::No, 50.0),
        );
        assert_eq!(r.final_lean, Lean::Yes);
    }

    #[test]
    fn test_no_combo_always_wins() {
        for lean in [Lean::Yes, Lean::No, Lean::Wait, Lean::Insufficient] {
            let r = resolve(
                &weight(lean, 80.0),
                &matched(ComboLean::No),
                &combo(ComboLean::No, 100.0),
            );
            assert_eq!(r.final_lean, Lean::No);
            assert_eq!(r.final_confidence, 100.0);
        }
    }

    #[test]
    fn test_yes_combo_cannot_beat_weighted_no() {
        let r = resolve(
            &weight(Lean::No, 66.0),
            &matched(ComboLean::Yes),
            &combo(ComboLean::Yes, 100.0),
        );
        assert_eq!(r.final_lean, Lean::No);
        assert_eq!(r.final_confidence, 66.0);
    }

    #[test]
    fn test_yes_combo_lifts_wait() {
        let r = resolve(
            &weight(Lean::Wait, 40.0),
            &matched(ComboLean::Yes),
            &combo(ComboLean::Yes, 71.0),
        );
        assert_eq!(r.final_lean, Lean::Yes);
        assert_eq!(r.final_confidence, 71.0);
        assert!(r.combination_applied);
    }

    #[test]
    fn test_wait_combo_keeps_higher_confidence() {
        let r = resolve(
            &weight(Lean::Yes, 90.0),
            &matched(ComboLean::Wait),
            &combo(ComboLean::Wait, 60.0),
        );
        assert_eq!(r.final_lean, Lean::Wait);
        assert_eq!(r.final_confidence, 90.0);
    }

    #[test]
    fn test_deterministic() {
        let w = weight(Lean::Wait, 45.0);
        let m = matched(ComboLean::Yes);
        let c = combo(ComboLean::Yes, 80.0);
        assert_eq!(resolve(&w, &m, &c), resolve(&w, &m, &c));
    }
}
