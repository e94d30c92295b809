//! Prompt Assembler: context block + template for the text generator
//!
//! Template choice:
//! - signs insufficient → `insufficient` (asks for more signs, no verdict)
//! - deep reading       → `deep` (5-day synthesis)
//! - otherwise          → `quick`
//!
//! Directional templates force the verdict to open with the final lean word.

use crate::core::question::guidance;
use crate::core::sign_table::SignTable;
use crate::types::{
    CombinationLean, QuestionAnalysis, ResolvedVerdict, SignCheck, SignCombination,
    TemplateKind, VerdictLean, VerdictWeight, WeightSummary,
};
use crate::JOURNEY_DAYS;

/// Sign families that earn an advisory note when two or more are present
struct PatternGroup {
    name: &'static str,
    fragments: &'static [&'static str],
    note: &'static str,
}

const PATTERN_GROUPS: &[PatternGroup] = &[
    PatternGroup {
        name: "number",
        fragments: &["number", "111", "222", "333", "444", "555", "666", "777", "888", "999", "1234", "clock", "time"],
        note: "Numbers keep repeating. The universe is speaking in numerical language; treat timing as part of the answer.",
    },
    PatternGroup {
        name: "body",
        fragments: &["gut", "chills", "goosebumps", "stomach", "shiver", "tingl", "heart", "emotion", "warmth", "frozen", "energy"],
        note: "The body is confirming the message. Physical knowing is rarely wrong; weigh it above logic.",
    },
    PatternGroup {
        name: "dream",
        fragments: &["dream", "nightmare", "woke", "sleep"],
        note: "The subconscious is active. Dreams are carrying part of this answer; look at what they share.",
    },
    PatternGroup {
        name: "animal",
        fragments: &["bird", "butterfly", "ladybug", "animal", "cardinal", "hawk", "eagle", "owl", "dragonfly", "spider", "snake", "deer", "crow", "raven"],
        note: "Animal messengers are crossing the path repeatedly. Nature is sending envoys; their symbolism compounds.",
    },
    PatternGroup {
        name: "people",
        fragments: &["someone", "stranger", "person", "they called", "name called", "reached out"],
        note: "People are acting as messengers. The answer may arrive through another person's words.",
    },
    PatternGroup {
        name: "spirit",
        fragments: &["feather", "presence", "scent", "deceased", "spirit", "angel", "penny"],
        note: "Spirit communication is present. Someone unseen may be offering support with this question.",
    },
];

/// Everything the assembler reads, borrowed from one evaluation
#[derive(Debug, Clone, Copy)]
pub struct ContextInput<'a> {
    pub question: &'a str,
    pub signs: &'a [String],
    pub analysis: &'a QuestionAnalysis,
    pub table: &'a SignTable,
    pub weights: &'a WeightSummary,
    pub sign_check: &'a SignCheck,
    pub weight_lean: &'a VerdictLean,
    pub combinations: &'a [SignCombination],
    pub combination_lean: &'a CombinationLean,
    pub verdict: &'a ResolvedVerdict,
}

/// Pick the template family
pub fn select_template(sign_check: &SignCheck, is_deep_reading: bool) -> TemplateKind {
    if !sign_check.sufficient {
        TemplateKind::Insufficient
    } else if is_deep_reading {
        TemplateKind::Deep
    } else {
        TemplateKind::Quick
    }
}

/// Serialize analysis, signs, combinations and verdict into one text block
///
/// With too few signs the directional lean lines are left out.
pub fn build_context(input: &ContextInput<'_>) -> String {
    let mut out = String::new();
    let a = input.analysis;

    out.push_str("=== QUESTION ANALYSIS ===\n");
    out.push_str(&format!("Type: {}\n", a.question_type));
    out.push_str(&format!("Domain: {}\n", a.domain));
    out.push_str(&format!("Urgency: {}\n", a.urgency.as_str()));
    out.push_str(&format!("Sentiment: {}\n", a.sentiment.as_str()));
    out.push_str(&format!("Wants permission: {}\n", yes_no(a.wants_permission)));
    out.push_str(&format!("Wants validation: {}\n", yes_no(a.wants_validation)));
    out.push_str(&format!("Wants warning: {}\n", yes_no(a.wants_warning)));
    if !a.keywords.is_empty() {
        out.push_str(&format!("Keywords: {}\n", a.keywords.join(", ")));
    }

    let guidance = guidance(a);
    if !guidance.is_empty() {
        out.push_str("\n=== GUIDANCE ===\n");
        out.push_str(guidance.trim_end());
        out.push('\n');
    }

    out.push_str("\n=== SIGN BREAKDOWN ===\n");
    if input.signs.is_empty() {
        out.push_str("(no signs reported)\n");
    }
    for (i, sign) in input.signs.iter().enumerate() {
        let m = input.table.lookup(sign);
        out.push_str(&format!("{}. \"{}\"\n", i + 1, sign));
        if m.is_fallback() {
            out.push_str("   (personal sign, interpret from the person's own words)\n");
        }
        out.push_str(&format!("   Core: {}\n", m.core));
        out.push_str(&format!("   {} context: {}\n", a.domain, m.context_for(a.domain)));
        out.push_str(&format!("   Energy: {} (strength {})\n", m.verdict_weight, m.weight_strength));
        out.push_str(&format!("   If yes: {}\n", m.yes_energy));
        out.push_str(&format!("   If no: {}\n", m.no_energy));
        out.push_str(&format!("   If wait: {}\n", m.wait_energy));
        if !m.warnings.is_empty() {
            out.push_str(&format!("   Cautions: {}\n", m.warnings.join("; ")));
        }
    }

    if !input.combinations.is_empty() {
        out.push_str("\n=== SIGN COMBINATIONS ===\n");
        for combo in input.combinations {
            out.push_str(&format!(
                "* {} (power {}/5, leans {}): {}\n",
                combo.name, combo.power_level, combo.verdict_lean, combo.meaning
            ));
        }
    }

    let cross = cross_sign_notes(input.signs, input.table);
    if !cross.is_empty() {
        out.push_str("\n=== CROSS-SIGN NOTES ===\n");
        for note in cross {
            out.push_str(&format!("- {}\n", note));
        }
    }

    let patterns = pattern_notes(input.signs, input.table);
    if !patterns.is_empty() {
        out.push_str("\n=== PATTERN NOTES ===\n");
        for note in patterns {
            out.push_str(&format!("- {}\n", note));
        }
    }

    let w = input.weights;
    let check = input.sign_check;
    out.push_str("\n=== VERDICT ENGINE ===\n");
    out.push_str(&format!(
        "Weights: positive {}, negative {}, wait {}, neutral signs {}\n",
        w.positive_score, w.negative_score, w.wait_score, w.neutral_count
    ));
    out.push_str(&format!(
        "Sign check: {} ({:?}) - {}\n",
        if check.sufficient { "sufficient" } else { "insufficient" },
        check.confidence,
        check.reason
    ));

    if !check.sufficient {
        out.push_str("FINAL LEAN: none (more signs needed)\n");
        return out;
    }

    out.push_str(&format!(
        "Sign-weight lean: {} ({:.0}%) - {}\n",
        input.weight_lean.lean, input.weight_lean.confidence, input.weight_lean.reasoning
    ));
    if !input.combinations.is_empty() {
        out.push_str(&format!(
            "Combination lean: {} ({:.0}%)\n",
            input.combination_lean.lean, input.combination_lean.confidence
        ));
    }
    out.push_str(&format!(
        "FINAL LEAN: {} (confidence {:.0}%)\n",
        input.verdict.final_lean.as_str().to_uppercase(),
        input.verdict.final_confidence
    ));

    out
}

/// Amplifier and contradictor relations between the user's own signs
pub fn cross_sign_notes(signs: &[String], table: &SignTable) -> Vec<String> {
    let mut notes = Vec::new();

    for (i, sign) in signs.iter().enumerate() {
        let meaning = table.lookup(sign);
        if meaning.is_fallback() {
            continue;
        }
        let others = signs.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, s)| s);

        for other in others {
            let other_lower = other.to_lowercase();
            if meaning.amplifiers.iter().any(|f| other_lower.contains(&f.to_lowercase())) {
                notes.push(format!("\"{}\" is amplified by \"{}\"", sign, other));
            }
            if meaning.contradictors.iter().any(|f| other_lower.contains(&f.to_lowercase())) {
                notes.push(format!("\"{}\" is in tension with \"{}\"", sign, other));
            }
        }
    }

    notes
}

/// Fixed advisory notes for sign families that repeat
pub fn pattern_notes(signs: &[String], table: &SignTable) -> Vec<String> {
    let lowered: Vec<String> = signs.iter().map(|s| s.to_lowercase()).collect();
    let mut notes = Vec::new();

    for group in PATTERN_GROUPS {
        let count = lowered
            .iter()
            .filter(|s| group.fragments.iter().any(|f| s.contains(f)))
            .count();
        if count >= 2 {
            notes.push(format!("{} {} signs: {}", count, group.name, group.note));
        }
    }

    let warnings = signs
        .iter()
        .filter(|s| table.lookup(s).verdict_weight == VerdictWeight::Negative)
        .count();
    if warnings >= 2 {
        notes.push(format!(
            "{} warning signs: several signs carry caution. Do not dismiss them to deliver a happier answer.",
            warnings
        ));
    }

    for (i, sign) in signs.iter().enumerate() {
        let first = signs.iter().position(|s| s == sign) == Some(i);
        let repeats = signs.iter().filter(|s| *s == sign).count();
        if first && repeats > 1 {
            notes.push(format!(
                "\"{}\" appeared {} times: repetition turns a notice into a necessity.",
                sign, repeats
            ));
        }
    }

    notes
}

/// Full prompt for the text generator
pub fn render(kind: TemplateKind, input: &ContextInput<'_>, day_count: Option<u8>) -> String {
    let context = build_context(input);
    let signs = input
        .signs
        .iter()
        .map(|s| format!("- {}", s))
        .collect::<Vec<_>>()
        .join("\n");

    match kind {
        TemplateKind::Insufficient => format!(
            "You are The Orakl, a mystical oracle interpreting signs from the universe.\n\
             Someone asked a question but has not noticed enough signs for a real answer.\n\n\
             Their question: \"{question}\"\n\n\
             Signs they noticed:\n{signs}\n\n\
             {context}\n\
             RULES:\n\
             - Do NOT answer yes, no, or wait. Do not hint at a direction.\n\
             - Acknowledge what their signs show so far, warmly and briefly.\n\
             - Explain that the universe needs more signs, and ask them to keep watching.\n\
             - Mention that a 5-day Deep Reading gathers enough signs for a clear answer.\n\
             - 2 short paragraphs.\n\n\
             Respond with JSON in this exact format:\n\
             {{\n  \"reading\": \"Your reading text here...\",\n  \"verdict\": \"A short 3-6 word phrase asking for more signs\"\n}}",
            question = input.question,
            signs = if signs.is_empty() { "(none)".to_string() } else { signs },
            context = context,
        ),
        TemplateKind::Quick => {
            let word = verdict_word(input);
            format!(
                "You are The Orakl, a mystical oracle interpreting signs from the universe.\n\
                 Someone has asked a question and reported the signs they've noticed. Give them a reading.\n\n\
                 Their question: \"{question}\"\n\n\
                 Signs they noticed:\n{signs}\n\n\
                 {context}\n\
                 GUIDELINES:\n\
                 - Be warm, wise, and slightly mysterious, but honest.\n\
                 - Connect the signs into one narrative tied to their specific question.\n\
                 - The verdict engine has decided: {word}. Your reading must support it.\n\
                 - Write in flowing prose, 3-4 paragraphs, no bullet points.\n\n\
                 Respond with JSON in this exact format:\n\
                 {{\n  \"reading\": \"Your full reading text here...\",\n  \"verdict\": \"{word} — a short 3-6 word phrase\"\n}}\n\
                 The verdict MUST begin with \"{word}\".",
                question = input.question,
                signs = signs,
                context = context,
                word = word,
            )
        }
        TemplateKind::Deep => {
            let word = verdict_word(input);
            let days = day_count.unwrap_or(JOURNEY_DAYS);
            format!(
                "You are The Orakl, a mystical oracle interpreting signs from the universe.\n\
                 This person committed to a {days}-day Deep Reading and logged signs every day.\n\
                 Honor that commitment with a thorough synthesis.\n\n\
                 Their question: \"{question}\"\n\n\
                 All signs across {days} days:\n{signs}\n\n\
                 {context}\n\
                 STRUCTURE:\n\
                 1. Opening: what the universe has been building across the {days} days.\n\
                 2. The signs: how the strongest signs and combinations speak to the question.\n\
                 3. Tension: any warnings or contradictions, named honestly.\n\
                 4. The answer: the verdict engine has decided {word}; explain why.\n\
                 5. Guidance: one concrete next step.\n\
                 Write 5-7 paragraphs of flowing prose.\n\n\
                 Respond with JSON in this exact format:\n\
                 {{\n  \"reading\": \"Your full reading text here...\",\n  \"verdict\": \"{word} — a short 3-8 word phrase\"\n}}\n\
                 The verdict MUST begin with \"{word}\".",
                question = input.question,
                signs = signs,
                context = context,
                word = word,
                days = days,
            )
        }
    }
}

fn verdict_word(input: &ContextInput<'_>) -> &'static str {
    input.verdict.final_lean.verdict_word().unwrap_or("WAIT")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SufficiencyLevel;

    fn signs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn check(sufficient: bool) -> SignCheck {
        SignCheck {
            sufficient,
            confidence: SufficiencyLevel::Medium,
            reason: String::new(),
        }
    }

    #[test]
    fn test_select_template() {
        assert_eq!(select_template(&check(false), true), TemplateKind::Insufficient);
        assert_eq!(select_template(&check(false), false), TemplateKind::Insufficient);
        assert_eq!(select_template(&check(true), true), TemplateKind::Deep);
        assert_eq!(select_template(&check(true), false), TemplateKind::Quick);
    }

    #[test]
    fn test_amplifier_and_contradictor_notes() {
        let table = SignTable::builtin();
        let notes = cross_sign_notes(
            &signs(&["111 — New beginnings, manifestation", "Butterfly appeared", "Lost something"]),
            &table,
        );
        assert!(notes.contains(&"\"111 — New beginnings, manifestation\" is amplified by \"Butterfly appeared\"".to_string()));
        assert!(notes.contains(&"\"111 — New beginnings, manifestation\" is in tension with \"Lost something\"".to_string()));
    }

    #[test]
    fn test_sign_is_never_its_own_amplifier() {
        let table = SignTable::builtin();
        assert!(cross_sign_notes(&signs(&["Butterfly appeared"]), &table).is_empty());
    }

    #[test]
    fn test_pattern_notes() {
        let table = SignTable::builtin();
        let notes = pattern_notes(
            &signs(&[
                "Vivid dream I remembered",
                "Nightmare that felt like a warning",
                "Something broke",
                "Something broke",
            ]),
            &table,
        );

        assert!(notes.iter().any(|n| n.starts_with("2 dream signs")));
        assert!(notes.iter().any(|n| n.starts_with("3 warning signs")));
        assert!(notes.iter().any(|n| n.starts_with("\"Something broke\" appeared 2 times")));
    }

    #[test]
    fn test_single_family_member_is_quiet() {
        let table = SignTable::builtin();
        let notes = pattern_notes(&signs(&["Butterfly appeared", "Rainbow appeared"]), &table);
        assert!(notes.is_empty());
    }
}
