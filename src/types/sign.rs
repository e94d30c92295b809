//! Sign meaning records

use serde::{Deserialize, Serialize};
use crate::types::Domain;

/// Coarse directional category of a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictWeight {
    Positive,
    Negative,
    Neutral,
    Wait,
}

impl std::fmt::Display for VerdictWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VerdictWeight::Positive => "positive",
            VerdictWeight::Negative => "negative",
            VerdictWeight::Neutral => "neutral",
            VerdictWeight::Wait => "wait",
        };
        write!(f, "{}", name)
    }
}

/// Layered interpretation of one canonical sign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignMeaning {
    /// Canonical label (table key)
    pub label: String,
    pub core: String,
    pub yes_energy: String,
    pub no_energy: String,
    pub wait_energy: String,
    /// Default context, used for every non-specific domain
    pub emotional_context: String,
    pub career_context: String,
    pub relationship_context: String,
    pub spiritual_context: String,
    /// Caution notes, in order
    pub warnings: Vec<String>,
    /// Label fragments that strengthen this sign when co-present
    pub amplifiers: Vec<String>,
    /// Label fragments that create tension when co-present
    pub contradictors: Vec<String>,
    pub verdict_weight: VerdictWeight,
    /// 1-3
    pub weight_strength: u8,
}

impl SignMeaning {
    /// Record used for custom or unknown signs
    pub fn fallback() -> Self {
        Self {
            label: String::new(),
            core: "A personal sign that holds meaning specific to your journey.".to_string(),
            yes_energy: "If this sign felt positive, trust that feeling.".to_string(),
            no_energy: "If this sign felt like a warning, honor that intuition.".to_string(),
            wait_energy: "If you're uncertain, more clarity will come.".to_string(),
            emotional_context: "Your emotional response is the interpretation.".to_string(),
            career_context: "Consider how this relates to your professional life.".to_string(),
            relationship_context: "Consider how this relates to your relationships.".to_string(),
            spiritual_context: "Personal signs are powerful—the universe speaks your language.".to_string(),
            warnings: vec!["Trust your gut interpretation".to_string()],
            amplifiers: vec![
                "Appeared multiple times".to_string(),
                "Strong emotional response".to_string(),
            ],
            contradictors: vec!["Easily explained by mundane causes".to_string()],
            verdict_weight: VerdictWeight::Neutral,
            weight_strength: 1,
        }
    }

    /// True for the custom/unknown fallback record
    pub fn is_fallback(&self) -> bool {
        self.label.is_empty()
    }

    /// Context string for a question domain (emotional is the default)
    pub fn context_for(&self, domain: Domain) -> &str {
        match domain {
            Domain::Relationship => &self.relationship_context,
            Domain::Career => &self.career_context,
            Domain::Spiritual => &self.spiritual_context,
            Domain::Financial | Domain::Health | Domain::Decision | Domain::General => {
                &self.emotional_context
            }
        }
    }
}
