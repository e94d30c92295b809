//! Reading pipeline: plan → generator → parsed reading → stored record

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::core::generator::{parse_generation, GenerationRequest, TextGenerator};
use crate::core::store::{input_digest, ReadingStore};
use crate::types::{GeneratedReading, ReadingOutcome, ReadingPlan, ReadingRecord};
use crate::OraklError;

/// Generate, parse and persist one reading
///
/// Generator failures are returned as-is with no retry. A store failure
/// only costs the id.
pub async fn generate_reading(
    plan: &ReadingPlan,
    generator: &dyn TextGenerator,
    store: Option<&dyn ReadingStore>,
) -> Result<ReadingOutcome, OraklError> {
    let request = GenerationRequest {
        prompt: plan.prompt.clone(),
        max_output_tokens: plan.max_output_tokens,
    };

    let raw = generator.generate(&request).await.map_err(|e| {
        error!("Text generation failed [{}]: {}", e.code(), e);
        e
    })?;

    let generated = parse_generation(&raw, plan.verdict.final_lean, plan.template);
    let record = build_record(plan, &generated);

    let id = match store {
        Some(store) => match store.save(&record) {
            Ok(id) => {
                info!("Stored reading {} ({}, {})", id, plan.template.as_str(), plan.verdict.final_lean);
                Some(id)
            }
            Err(e) => {
                warn!("Failed to store reading [{}]: {}", e.code(), e);
                None
            }
        },
        None => None,
    };

    Ok(ReadingOutcome {
        reading: generated.reading,
        verdict: generated.verdict,
        id,
        final_lean: plan.verdict.final_lean,
        final_confidence: plan.verdict.final_confidence,
    })
}

/// Flat record for persistence
pub fn build_record(plan: &ReadingPlan, generated: &GeneratedReading) -> ReadingRecord {
    let request = &plan.request;
    ReadingRecord {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        question: request.question.clone(),
        signs: request.signs.clone(),
        path_type: request.path_type.clone(),
        is_deep_reading: request.is_deep_reading,
        reading: generated.reading.clone(),
        verdict: generated.verdict.clone(),
        final_lean: plan.verdict.final_lean,
        final_confidence: plan.verdict.final_confidence,
        question_type: plan.analysis.question_type.as_str().to_string(),
        question_domain: plan.analysis.domain.as_str().to_string(),
        combination_count: plan.combinations.len(),
        input_digest: input_digest(&request.question, &request.signs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::core::engine::Oracle;
    use crate::core::store::MemoryReadingStore;
    use crate::types::{Lean, ReadingRequest};

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, OraklError> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    #[async_trait]
    impl TextGenerator for Broken {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, OraklError> {
            Err(OraklError::GenerationStatus {
                status: 529,
                body: "overloaded".to_string(),
            })
        }
    }

    struct FailingStore;

    impl ReadingStore for FailingStore {
        fn save(&self, _record: &ReadingRecord) -> Result<String, OraklError> {
            Err(OraklError::Store("disk full".to_string()))
        }

        fn load(&self, _id: &str) -> Result<Option<ReadingRecord>, OraklError> {
            Ok(None)
        }
    }

    fn yes_plan() -> ReadingPlan {
        Oracle::new().evaluate(&ReadingRequest::new(
            "Should I start the business?",
            vec![
                "Butterfly appeared".to_string(),
                "Rainbow appeared".to_string(),
                "Ladybug landed on me".to_string(),
            ],
        ))
    }

    #[tokio::test]
    async fn test_reading_stored() {
        let store = MemoryReadingStore::new();
        let generator = Canned(r#"{"reading": "Wings open.", "verdict": "The path is opening"}"#);
        let plan = yes_plan();

        let outcome = generate_reading(&plan, &generator, Some(&store)).await.unwrap();
        assert_eq!(outcome.verdict, "YES — The path is opening");
        assert_eq!(outcome.final_lean, Lean::Yes);

        let id = outcome.id.unwrap();
        let record = store.load(&id).unwrap().unwrap();
        assert_eq!(record.reading, "Wings open.");
        assert_eq!(record.question_domain, "career");
        assert_eq!(record.input_digest, input_digest(&plan.request.question, &plan.request.signs));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let store = MemoryReadingStore::new();
        let err = generate_reading(&yes_plan(), &Broken, Some(&store)).await.unwrap_err();
        assert!(err.is_upstream());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_keeps_reading() {
        let generator = Canned(r#"{"reading": "Wings open.", "verdict": "YES — go"}"#);
        let outcome = generate_reading(&yes_plan(), &generator, Some(&FailingStore)).await.unwrap();
        assert_eq!(outcome.id, None);
        assert_eq!(outcome.reading, "Wings open.");
    }

    #[tokio::test]
    async fn test_no_store() {
        let generator = Canned("just prose");
        let outcome = generate_reading(&yes_plan(), &generator, None).await.unwrap();
        assert_eq!(outcome.id, None);
        assert_eq!(outcome.reading, "just prose");
        assert_eq!(outcome.verdict, "YES — The path is opening");
    }
}
