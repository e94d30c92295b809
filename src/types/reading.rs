//! Reading requests, plans and stored records

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{
    CombinationLean, Lean, QuestionAnalysis, ResolvedVerdict, SignCheck, SignCombination,
    VerdictLean, WeightSummary,
};

/// One question + signs submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingRequest {
    pub question: String,
    pub signs: Vec<String>,
    #[serde(default)]
    pub path_type: Option<String>,
    #[serde(default)]
    pub is_deep_reading: bool,
    #[serde(default)]
    pub day_count: Option<u8>,
}

impl ReadingRequest {
    pub fn new(question: impl Into<String>, signs: Vec<String>) -> Self {
        Self {
            question: question.into(),
            signs,
            ..Default::default()
        }
    }

    /// Mark as a Deep Reading over `days` days
    pub fn deep(mut self, days: u8) -> Self {
        self.is_deep_reading = true;
        self.day_count = Some(days);
        self
    }
}

/// Prompt template family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Asks for more signs, never a verdict
    Insufficient,
    Quick,
    Deep,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Insufficient => "insufficient",
            TemplateKind::Quick => "quick",
            TemplateKind::Deep => "deep",
        }
    }
}

/// Everything the deterministic engine derived for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPlan {
    pub request: ReadingRequest,
    pub analysis: QuestionAnalysis,
    pub weights: WeightSummary,
    pub sign_check: SignCheck,
    pub weight_lean: VerdictLean,
    pub combinations: Vec<SignCombination>,
    pub combination_lean: CombinationLean,
    pub verdict: ResolvedVerdict,
    pub template: TemplateKind,
    pub prompt: String,
    pub max_output_tokens: u32,
}

/// Parsed generator output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReading {
    pub reading: String,
    pub verdict: String,
    /// False when the output had no usable JSON and fallbacks were applied
    #[serde(default = "default_true")]
    pub well_formed: bool,
}

fn default_true() -> bool {
    true
}

/// Flat persisted record of a finished reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub question: String,
    pub signs: Vec<String>,
    pub path_type: Option<String>,
    pub is_deep_reading: bool,
    pub reading: String,
    pub verdict: String,
    pub final_lean: Lean,
    pub final_confidence: f64,
    pub question_type: String,
    pub question_domain: String,
    pub combination_count: usize,
    /// SHA-256 hex of question + signs
    pub input_digest: String,
}

/// What the caller gets back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingOutcome {
    pub reading: String,
    pub verdict: String,
    /// None when persistence failed or is disabled
    pub id: Option<String>,
    pub final_lean: Lean,
    pub final_confidence: f64,
}
