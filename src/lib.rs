//! The Orakl: sign interpretation and verdict engine
//!
//! question + signs → classifier / meaning table / combinations → weighted lean
//! → resolved verdict → prompt for the text generator → stored reading

pub mod config;
pub mod core;
pub mod error;
pub mod types;

pub use error::OraklError;

// =============================================================================
// SUFFICIENCY [tunable] - how many signs before the universe "speaks"
// =============================================================================

/// At or below this many signs a reading is never attempted
pub const MIN_SIGNS_INSUFFICIENT: usize = 1;

/// Two signs need at least this much scored weight to be sufficient
pub const TWO_SIGN_MIN_WEIGHT: u32 = 4;

/// From this many signs on, confidence is high
pub const HIGH_CONFIDENCE_SIGN_COUNT: usize = 5;

// =============================================================================
// LEAN THRESHOLDS [tunable] - empirically chosen, preserved as-is
// =============================================================================

/// Neutral-majority sets below this total weight read as ambiguous
pub const AMBIGUOUS_MAX_WEIGHT: u32 = 3;
pub const AMBIGUOUS_CONFIDENCE: f64 = 40.0;

/// Negative score that forces `no` on its own
pub const NO_HARD_SCORE: u32 = 6;
/// Negative score that forces `no` when negatives are the majority
pub const NO_MAJORITY_SCORE: u32 = 4;
pub const NO_MAJORITY_PERCENT: f64 = 50.0;

/// Positive dominance for a clear `yes`
pub const YES_PERCENT: f64 = 60.0;
pub const YES_MIN_SCORE: u32 = 4;

/// Wait share that reads as a timing signal
pub const WAIT_PERCENT: f64 = 40.0;

/// Confidence formulas: min(cap, base + percent * slope)
pub const STRONG_CONFIDENCE_BASE: f64 = 50.0;
pub const STRONG_CONFIDENCE_SLOPE: f64 = 0.4;
pub const STRONG_CONFIDENCE_CAP: f64 = 90.0;
pub const WAIT_CONFIDENCE_BASE: f64 = 40.0;
pub const WAIT_CONFIDENCE_SLOPE: f64 = 0.3;
pub const WAIT_CONFIDENCE_CAP: f64 = 70.0;
pub const LEAN_YES_CONFIDENCE_BASE: f64 = 50.0;
pub const LEAN_YES_CONFIDENCE_SLOPE: f64 = 0.3;
pub const LEAN_YES_CONFIDENCE_CAP: f64 = 75.0;
pub const FALLBACK_WAIT_CONFIDENCE: f64 = 50.0;

/// Combinations only steer the verdict above this confidence
pub const COMBINATION_OVERRIDE_CONFIDENCE: f64 = 50.0;

// =============================================================================
// GENERATION
// =============================================================================

pub const QUICK_MAX_TOKENS: u32 = 1024;
pub const DEEP_MAX_TOKENS: u32 = 2048;
pub const INSUFFICIENT_MAX_TOKENS: u32 = 512;

/// Number of days in a Deep Reading journey
pub const JOURNEY_DAYS: u8 = 5;

/// Longest verdict kept from generator output
pub const MAX_VERDICT_CHARS: usize = 120;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
