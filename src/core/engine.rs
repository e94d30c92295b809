//! Oracle: runs the deterministic pipeline for one request
//!
//! analyze → weights → sufficiency → weight lean → combinations →
//! combination lean → resolve → template → prompt

use tracing::{debug, info};

use crate::config::Config;
use crate::core::combinations::{combination_lean, CombinationCatalog};
use crate::core::prompt::{self, ContextInput};
use crate::core::question::QuestionAnalyzer;
use crate::core::sign_table::SignTable;
use crate::core::verdict::resolve;
use crate::core::weights::{lean_for, sufficiency_for, WeightAggregator};
use crate::types::{ReadingPlan, ReadingRequest, ResolvedVerdict, TemplateKind};
use crate::{OraklError, DEEP_MAX_TOKENS, INSUFFICIENT_MAX_TOKENS, QUICK_MAX_TOKENS};

/// Output budget per template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimits {
    pub quick: u32,
    pub deep: u32,
    pub insufficient: u32,
}

impl Default for TokenLimits {
    fn default() -> Self {
        Self {
            quick: QUICK_MAX_TOKENS,
            deep: DEEP_MAX_TOKENS,
            insufficient: INSUFFICIENT_MAX_TOKENS,
        }
    }
}

impl TokenLimits {
    pub fn for_template(&self, kind: TemplateKind) -> u32 {
        match kind {
            TemplateKind::Quick => self.quick,
            TemplateKind::Deep => self.deep,
            TemplateKind::Insufficient => self.insufficient,
        }
    }
}

/// Read-only engine state, shareable across requests
#[derive(Debug, Clone, Default)]
pub struct Oracle {
    table: SignTable,
    catalog: CombinationCatalog,
    analyzer: QuestionAnalyzer,
    limits: TokenLimits,
}

impl Oracle {
    /// Engine over the built-in tables
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(table: SignTable, catalog: CombinationCatalog, analyzer: QuestionAnalyzer) -> Self {
        Self {
            table,
            catalog,
            analyzer,
            limits: TokenLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: TokenLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Built-in tables plus the configured extension file and token limits
    pub fn from_config(config: &Config) -> Result<Self, OraklError> {
        let mut table = SignTable::builtin();
        if let Some(path) = &config.catalog.extra_signs_path {
            let added = table.extend_from_file(path)?;
            info!("Sign table: {} entries ({} from {})", table.len(), added, path.display());
        }

        let limits = TokenLimits {
            quick: config.generator.quick_max_tokens,
            deep: config.generator.deep_max_tokens,
            insufficient: config.generator.insufficient_max_tokens,
        };

        Ok(Self::with_parts(table, CombinationCatalog::builtin(), QuestionAnalyzer::new()).with_limits(limits))
    }

    pub fn table(&self) -> &SignTable {
        &self.table
    }

    pub fn catalog(&self) -> &CombinationCatalog {
        &self.catalog
    }

    /// Full deterministic evaluation
    pub fn evaluate(&self, request: &ReadingRequest) -> ReadingPlan {
        let signs = &request.signs;
        let analysis = self.analyzer.analyze(&request.question);

        let weights = WeightAggregator::new(&self.table).calculate_weights(signs);
        let sign_check = sufficiency_for(signs.len(), &weights);
        let weight_lean = lean_for(signs.len(), &weights, &sign_check);

        let combinations = self.catalog.find_matches(signs);
        let combo_lean = combination_lean(&combinations);
        // too few signs: no combination may give the reading a direction
        let verdict = if sign_check.sufficient {
            resolve(&weight_lean, &combinations, &combo_lean)
        } else {
            ResolvedVerdict::insufficient()
        };

        let template = prompt::select_template(&sign_check, request.is_deep_reading);
        let input = ContextInput {
            question: &request.question,
            signs,
            analysis: &analysis,
            table: &self.table,
            weights: &weights,
            sign_check: &sign_check,
            weight_lean: &weight_lean,
            combinations: &combinations,
            combination_lean: &combo_lean,
            verdict: &verdict,
        };
        let rendered = prompt::render(template, &input, request.day_count);

        debug!(
            "Evaluated {} signs: type={} domain={} weights=+{}/-{}/~{} rule={} combos={} final={} ({:.0}%) template={}",
            signs.len(),
            analysis.question_type,
            analysis.domain,
            weights.positive_score,
            weights.negative_score,
            weights.wait_score,
            weight_lean.rule.code(),
            combinations.len(),
            verdict.final_lean,
            verdict.final_confidence,
            template.as_str(),
        );

        ReadingPlan {
            request: request.clone(),
            analysis,
            weights,
            sign_check,
            weight_lean,
            combinations,
            combination_lean: combo_lean,
            verdict,
            template,
            prompt: rendered,
            max_output_tokens: self.limits.for_template(template),
        }
    }
}
