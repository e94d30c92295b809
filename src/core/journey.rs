//! Deep Reading journeys: five days of logged signs, then one deep reading

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::core::engine::Oracle;
use crate::core::generator::TextGenerator;
use crate::core::reading::generate_reading;
use crate::core::store::ReadingStore;
use crate::types::{Journey, JourneyPatch, ReadingOutcome, ReadingRequest};
use crate::{OraklError, JOURNEY_DAYS};

/// Journey day for `now`: whole days since `start` plus one, capped at 5
pub fn day_for(start: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
    let elapsed = (now - start).num_days().max(0);
    (elapsed + 1).min(JOURNEY_DAYS as i64) as u8
}

fn check_day(day: u8) -> Result<u8, OraklError> {
    if (1..=JOURNEY_DAYS).contains(&day) {
        Ok(day)
    } else {
        Err(OraklError::InvalidRequest(format!(
            "day must be between 1 and {}, got {}",
            JOURNEY_DAYS, day
        )))
    }
}

/// In-memory journey registry
#[derive(Debug, Default)]
pub struct JourneyBook {
    journeys: RwLock<HashMap<String, Journey>>,
}

impl JourneyBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, email: &str, question: &str) -> Result<Journey, OraklError> {
        if question.trim().is_empty() {
            return Err(OraklError::InvalidRequest("question is required".to_string()));
        }

        let journey = Journey {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_string(),
            question: question.trim().to_string(),
            start_date: Utc::now(),
            current_day: 1,
            daily_signs: Default::default(),
            completed: false,
            reading_text: None,
            verdict: None,
        };

        self.journeys.write().await.insert(journey.id.clone(), journey.clone());
        info!("Started journey {}", journey.id);
        Ok(journey)
    }

    /// Journey with `current_day` refreshed from its start date
    pub async fn get(&self, id: &str) -> Option<Journey> {
        self.get_at(id, Utc::now()).await
    }

    pub async fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<Journey> {
        let mut journeys = self.journeys.write().await;
        let journey = journeys.get_mut(id)?;
        journey.current_day = day_for(journey.start_date, now);
        Some(journey.clone())
    }

    /// Append signs to one day; `None` means today
    pub async fn log_signs(
        &self,
        id: &str,
        day: Option<u8>,
        signs: Vec<String>,
    ) -> Result<Option<Journey>, OraklError> {
        let signs: Vec<String> = signs
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if signs.is_empty() {
            return Err(OraklError::InvalidRequest("at least one sign is required".to_string()));
        }

        let mut journeys = self.journeys.write().await;
        let Some(journey) = journeys.get_mut(id) else {
            return Ok(None);
        };
        if journey.completed {
            return Err(OraklError::InvalidRequest("journey is already complete".to_string()));
        }

        let day = check_day(day.unwrap_or_else(|| day_for(journey.start_date, Utc::now())))?;
        journey.daily_signs.entry(day).or_default().extend(signs);
        journey.current_day = journey.current_day.max(day);

        Ok(Some(journey.clone()))
    }

    /// Apply the fields set in `patch`
    pub async fn update(&self, id: &str, patch: JourneyPatch) -> Result<Option<Journey>, OraklError> {
        if let Some(daily) = &patch.daily_signs {
            for day in daily.keys() {
                check_day(*day)?;
            }
        }
        if let Some(day) = patch.current_day {
            check_day(day)?;
        }

        let mut journeys = self.journeys.write().await;
        let Some(journey) = journeys.get_mut(id) else {
            return Ok(None);
        };

        if let Some(daily) = patch.daily_signs {
            journey.daily_signs = daily;
        }
        if let Some(day) = patch.current_day {
            journey.current_day = day;
        }
        if let Some(completed) = patch.completed {
            journey.completed = completed;
        }
        if let Some(text) = patch.reading_text {
            journey.reading_text = Some(text);
        }
        if let Some(verdict) = patch.verdict {
            journey.verdict = Some(verdict);
        }

        Ok(Some(journey.clone()))
    }

    /// Every logged sign, flattened in day order
    pub async fn all_signs(&self, id: &str) -> Option<Vec<String>> {
        self.journeys.read().await.get(id).map(Journey::all_signs)
    }

    /// Deep reading over all logged signs; marks the journey complete
    ///
    /// A completed journey keeps its reading; asking again is an error.
    pub async fn complete(
        &self,
        id: &str,
        oracle: &Oracle,
        generator: &dyn TextGenerator,
        store: Option<&dyn ReadingStore>,
    ) -> Result<Option<(Journey, ReadingOutcome)>, OraklError> {
        let found = self
            .journeys
            .read()
            .await
            .get(id)
            .map(|j| (j.completed, j.question.clone(), j.all_signs()));
        let Some((completed, question, signs)) = found else {
            return Ok(None);
        };
        if completed {
            return Err(OraklError::InvalidRequest("journey already has its reading".to_string()));
        }

        let mut request = ReadingRequest::new(question, signs).deep(JOURNEY_DAYS);
        request.path_type = Some("deep".to_string());
        let plan = oracle.evaluate(&request);

        // lock released across the generator call
        let outcome = generate_reading(&plan, generator, store).await?;

        let mut journeys = self.journeys.write().await;
        let Some(journey) = journeys.get_mut(id) else {
            return Ok(None);
        };
        if journey.completed {
            return Err(OraklError::InvalidRequest("journey already has its reading".to_string()));
        }
        journey.completed = true;
        journey.reading_text = Some(outcome.reading.clone());
        journey.verdict = Some(outcome.verdict.clone());
        info!("Completed journey {} ({} signs)", id, journey.signs_logged());

        Ok(Some((journey.clone(), outcome)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_day_for() {
        let start = Utc::now();
        assert_eq!(day_for(start, start), 1);
        assert_eq!(day_for(start, start + Duration::hours(23)), 1);
        assert_eq!(day_for(start, start + Duration::hours(25)), 2);
        assert_eq!(day_for(start, start + Duration::days(4)), 5);
        assert_eq!(day_for(start, start + Duration::days(30)), 5);
        assert_eq!(day_for(start, start - Duration::days(2)), 1);
    }

    #[tokio::test]
    async fn test_log_signs_appends_per_day() {
        let book = JourneyBook::new();
        let j = book.create("seer@example.com", "Will I move abroad?").await.unwrap();

        book.log_signs(&j.id, Some(1), vec!["Déjà vu".into()]).await.unwrap();
        let j = book
            .log_signs(&j.id, Some(1), vec!["Butterfly appeared".into(), "  ".into()])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(j.daily_signs[&1], vec!["Déjà vu", "Butterfly appeared"]);
    }

    #[tokio::test]
    async fn test_log_signs_rejects_bad_day() {
        let book = JourneyBook::new();
        let j = book.create("", "Will I move abroad?").await.unwrap();
        let err = book.log_signs(&j.id, Some(6), vec!["Déjà vu".into()]).await.unwrap_err();
        assert_eq!(err.code(), "E400_INVALID_REQUEST");
        assert!(book.log_signs("nope", Some(1), vec!["x".into()]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_refreshes_day() {
        let book = JourneyBook::new();
        let j = book.create("", "Will I move abroad?").await.unwrap();
        let later = book.get_at(&j.id, j.start_date + Duration::days(2)).await.unwrap();
        assert_eq!(later.current_day, 3);
    }

    #[tokio::test]
    async fn test_update_partial() {
        let book = JourneyBook::new();
        let j = book.create("", "Will I move abroad?").await.unwrap();
        let patch = JourneyPatch {
            verdict: Some("WAIT — Not yet".into()),
            ..Default::default()
        };
        let j = book.update(&j.id, patch).await.unwrap().unwrap();
        assert_eq!(j.verdict.as_deref(), Some("WAIT — Not yet"));
        assert!(!j.completed);
        assert_eq!(j.question, "Will I move abroad?");
    }
}
