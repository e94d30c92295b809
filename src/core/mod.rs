//! Core modules for the Orakl

pub mod matcher;
pub mod sign_table;
pub mod combinations;
pub mod question;
pub mod weights;
pub mod verdict;
pub mod prompt;
pub mod engine;
pub mod generator;
pub mod store;
pub mod reading;
pub mod journey;
pub mod catalog;
pub mod api;

pub use matcher::{MatchStrategy, SubstringMatch};
pub use sign_table::SignTable;
pub use combinations::{combination_lean, CombinationCatalog};
pub use question::{guidance, QuestionAnalyzer};
pub use weights::WeightAggregator;
pub use verdict::resolve;
pub use engine::{Oracle, TokenLimits};
pub use generator::{AnthropicGenerator, GenerationRequest, TextGenerator};
pub use store::{FileReadingStore, MemoryReadingStore, ReadingStore};
pub use reading::generate_reading;
pub use journey::{day_for, JourneyBook};
pub use api::{create_router, run_server, AppState};
