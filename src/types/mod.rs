//! Core types for the Orakl

mod sign;
mod question;
mod combination;
mod verdict;
mod reading;
mod journey;

pub use sign::{SignMeaning, VerdictWeight};
pub use question::{QuestionAnalysis, QuestionType, Domain, Urgency, Sentiment};
pub use combination::{SignCombination, ComboLean, CombinationLean};
pub use verdict::{WeightSummary, SignCheck, SufficiencyLevel, Lean, LeanRule, VerdictLean, ResolvedVerdict};
pub use reading::{ReadingRequest, ReadingPlan, TemplateKind, GeneratedReading, ReadingRecord, ReadingOutcome};
pub use journey::{Journey, JourneyPatch, SignCategory, Tier};
