//! Question Classifier: type, domain, urgency, sentiment and needs
//!
//! Keyword heuristics over the lowercased question. Every input, including
//! the empty string, yields a fully populated analysis.

use std::sync::Arc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::matcher::{MatchStrategy, SubstringMatch};
use crate::types::{Domain, QuestionAnalysis, QuestionType, Sentiment, Urgency};

// =============================================================================
// Domain keywords, scored by how many occur in the question
// =============================================================================

const RELATIONSHIP_KEYWORDS: &[&str] = &[
    "relationship", "partner", "boyfriend", "girlfriend", "husband", "wife",
    "marry", "marriage", "dating", "love", "ex", "crush", "soulmate",
    "twin flame", "breakup", "divorce", "propose", "engaged", "together",
    "him", "her", "they", "person", "someone", "family", "friend",
];

const CAREER_KEYWORDS: &[&str] = &[
    "job", "career", "work", "promotion", "boss", "coworker", "business",
    "company", "interview", "offer", "salary", "quit", "resign", "hired",
    "fired", "startup", "entrepreneur", "client", "project", "profession",
];

const FINANCIAL_KEYWORDS: &[&str] = &[
    "money", "invest", "investment", "buy", "sell", "house", "car", "stock",
    "savings", "debt", "loan", "afford", "rich", "wealth", "financial",
    "purchase", "expensive", "price", "cost", "pay",
];

const HEALTH_KEYWORDS: &[&str] = &[
    "health", "sick", "illness", "doctor", "medical", "surgery", "pregnant",
    "baby", "fertility", "diagnosis", "treatment", "heal", "recovery",
    "mental health", "therapy", "anxiety", "depression", "addiction",
];

const SPIRITUAL_KEYWORDS: &[&str] = &[
    "purpose", "meaning", "spiritual", "soul", "karma", "past life", "destiny",
    "fate", "meant to be", "sign", "universe", "god", "divine", "prayer",
    "meditation", "awakening", "path", "journey", "calling",
];

// =============================================================================
// Urgency cascade: first bucket with a hit wins
// =============================================================================

const IMMEDIATE_KEYWORDS: &[&str] = &["today", "tonight", "now", "immediately", "soon"];
const NEAR_FUTURE_KEYWORDS: &[&str] = &["this week", "this month", "next", "upcoming"];
const LONG_TERM_KEYWORDS: &[&str] = &["ever", "future", "eventually", "someday", "one day"];

// =============================================================================
// Sentiment
// =============================================================================

const HOPEFUL_WORDS: &[&str] = &[
    "hope", "wish", "want", "dream", "love", "excited", "happy", "positive",
];
const FEARFUL_WORDS: &[&str] = &[
    "afraid", "scared", "worried", "anxious", "fear", "nervous", "concern",
    "bad", "wrong", "mistake",
];
const CONFUSED_WORDS: &[&str] = &[
    "confused", "unsure", "don't know", "uncertain", "lost", "torn", "conflicted",
];

// =============================================================================
// Psychological needs
// =============================================================================

const PERMISSION_PHRASES: &[&str] = &["okay", "alright", "allowed", "can i"];
const VALIDATION_PHRASES: &[&str] = &["right", "correct", "good idea", "made the right"];
const WARNING_PHRASES: &[&str] = &["mistake", "wrong", "bad", "regret", "careful"];

/// Filler words never kept as personalization keywords
const KEYWORD_STOPWORDS: &[&str] = &[
    "should", "would", "could", "about", "think", "going", "really", "truly",
];

/// Keywords must be longer than this
const KEYWORD_MIN_CHARS: usize = 4;

lazy_static! {
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Question classifier
#[derive(Debug, Clone)]
pub struct QuestionAnalyzer {
    matcher: Arc<dyn MatchStrategy>,
}

impl Default for QuestionAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionAnalyzer {
    pub fn new() -> Self {
        Self {
            matcher: Arc::new(SubstringMatch),
        }
    }

    pub fn with_matcher(matcher: Arc<dyn MatchStrategy>) -> Self {
        Self { matcher }
    }

    /// Derive the full analysis for one question
    pub fn analyze(&self, question: &str) -> QuestionAnalysis {
        let q = question.to_lowercase();

        let question_type = self.question_type(&q);
        let domain = self.domain(&q, question_type);
        let urgency = self.urgency(&q);
        let sentiment = self.sentiment(&q);

        let wants_permission =
            question_type == QuestionType::ShouldI || self.any(&q, PERMISSION_PHRASES);
        let wants_validation =
            question_type == QuestionType::IsThis || self.any(&q, VALIDATION_PHRASES);
        let wants_warning = self.any(&q, WARNING_PHRASES);

        QuestionAnalysis {
            question_type,
            domain,
            urgency,
            sentiment,
            wants_permission,
            wants_validation,
            wants_warning,
            keywords: extract_keywords(&q),
        }
    }

    /// Prefix rules in priority order, then the `?` rule
    fn question_type(&self, q: &str) -> QuestionType {
        if starts_with_any(q, &["should i", "shall i"]) {
            QuestionType::ShouldI
        } else if starts_with_any(q, &["will", "is it going to"]) {
            QuestionType::WillIt
        } else if starts_with_any(q, &["is this", "is he", "is she", "is it", "am i"]) {
            QuestionType::IsThis
        } else if starts_with_any(q, &["what should", "what do i"]) {
            QuestionType::WhatShould
        } else if q.contains('?') && self.any(q, &["should", "will", "is it", "can i"]) {
            QuestionType::YesNo
        } else {
            QuestionType::OpenEnded
        }
    }

    /// Strict max score; ties resolved relationship > career > financial > health > spiritual
    fn domain(&self, q: &str, question_type: QuestionType) -> Domain {
        let scored = [
            (Domain::Relationship, self.count(q, RELATIONSHIP_KEYWORDS)),
            (Domain::Career, self.count(q, CAREER_KEYWORDS)),
            (Domain::Financial, self.count(q, FINANCIAL_KEYWORDS)),
            (Domain::Health, self.count(q, HEALTH_KEYWORDS)),
            (Domain::Spiritual, self.count(q, SPIRITUAL_KEYWORDS)),
        ];

        let max = scored.iter().map(|(_, s)| *s).max().unwrap_or(0);
        if max > 0 {
            if let Some((domain, _)) = scored.iter().find(|(_, s)| *s == max) {
                return *domain;
            }
        }

        if question_type == QuestionType::ShouldI {
            Domain::Decision
        } else {
            Domain::General
        }
    }

    fn urgency(&self, q: &str) -> Urgency {
        if self.any(q, IMMEDIATE_KEYWORDS) {
            Urgency::Immediate
        } else if self.any(q, NEAR_FUTURE_KEYWORDS) {
            Urgency::NearFuture
        } else if self.any(q, LONG_TERM_KEYWORDS) {
            Urgency::LongTerm
        } else {
            Urgency::Unknown
        }
    }

    /// Hopeful, then fearful, must beat both other counts; else confused if any
    fn sentiment(&self, q: &str) -> Sentiment {
        let hopeful = self.count(q, HOPEFUL_WORDS);
        let fearful = self.count(q, FEARFUL_WORDS);
        let confused = self.count(q, CONFUSED_WORDS);

        if hopeful > fearful && hopeful > confused {
            Sentiment::Hopeful
        } else if fearful > hopeful && fearful > confused {
            Sentiment::Fearful
        } else if confused > 0 {
            Sentiment::Confused
        } else {
            Sentiment::Neutral
        }
    }

    fn count(&self, q: &str, keywords: &[&str]) -> usize {
        keywords
            .iter()
            .filter(|k| self.matcher.contains_lower(q, k))
            .count()
    }

    fn any(&self, q: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.matcher.contains_lower(q, k))
    }
}

fn starts_with_any(q: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| q.starts_with(p))
}

/// Whitespace tokens longer than 4 chars that are not filler
fn extract_keywords(q: &str) -> Vec<String> {
    RE_WHITESPACE
        .split(q)
        .filter(|w| w.chars().count() > KEYWORD_MIN_CHARS && !KEYWORD_STOPWORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// Advisory text for the text generator, built from the analysis
pub fn guidance(analysis: &QuestionAnalysis) -> String {
    let mut out = String::new();

    let by_type = match analysis.question_type {
        QuestionType::ShouldI => Some(
            "This person is seeking PERMISSION. They likely already know what they want to do and are looking for cosmic validation. If the signs support it, give them that permission clearly. If not, help them understand why the universe is urging caution.",
        ),
        QuestionType::YesNo => Some(
            "This is a direct yes/no question. They want CLARITY, not ambiguity. Commit to a direction based on the signs. Even \"wait\" is better than wishy-washy non-answers.",
        ),
        QuestionType::WillIt => Some(
            "This person wants to know about OUTCOMES. Be honest that signs show tendencies, not certainties, but still give them a confident read on the direction the energy is flowing.",
        ),
        QuestionType::IsThis => Some(
            "This person wants VALIDATION or a REALITY CHECK. Help them see clearly what the signs reveal about the truth of their situation.",
        ),
        QuestionType::WhatShould => Some(
            "This person wants GUIDANCE, not just a yes/no. Use the signs to paint a path forward, not just confirm or deny.",
        ),
        QuestionType::OpenEnded => None,
    };

    let by_domain = match analysis.domain {
        Domain::Relationship => Some(
            "RELATIONSHIP READING: Weight emotional and interpersonal signs heavily (body sensations, dreams about people, unexpected encounters). Look for signs about connection, communication, and heart-centered symbols.",
        ),
        Domain::Career => Some(
            "CAREER READING: Weight timing signs (numbers, clocks), door/path imagery, and signs about direction and movement. Professional decisions often hinge on timing and alignment.",
        ),
        Domain::Financial => Some(
            "FINANCIAL READING: Look for abundance signs (888, found money, gifts). Also pay attention to warning signs (things breaking, loss). Financial questions need both opportunity and caution assessment.",
        ),
        Domain::Health => Some(
            "HEALTH READING: Body sensation signs are especially important. Signs of transformation (butterflies, snakes) can indicate healing. Do not make medical claims; speak to the energy.",
        ),
        Domain::Spiritual => Some(
            "SPIRITUAL READING: All signs carry weight here. Look for patterns, synchronicities, and repetition. The person is seeking meaning and connection to something larger.",
        ),
        Domain::Decision | Domain::General => None,
    };

    let by_sentiment = match analysis.sentiment {
        Sentiment::Fearful => Some(
            "NOTE: This person is approaching from FEAR. Be gentle but honest. If signs warrant caution, frame it as protective guidance, not confirmation of their worst fears.",
        ),
        Sentiment::Hopeful => Some(
            "NOTE: This person is approaching from HOPE. Honor their optimism if signs support it. If signs suggest caution, be kind but clear.",
        ),
        Sentiment::Confused => Some(
            "NOTE: This person is CONFUSED. They need clarity more than anything. Present the answer with clarity and structure.",
        ),
        Sentiment::Neutral => None,
    };

    for section in [by_type, by_domain, by_sentiment].into_iter().flatten() {
        out.push_str(section);
        out.push_str("\n\n");
    }

    if analysis.wants_permission {
        out.push_str("PSYCHOLOGICAL NOTE: They want permission. If the signs allow it, give it clearly. If not, explain why gently.\n\n");
    }
    if analysis.wants_validation {
        out.push_str("PSYCHOLOGICAL NOTE: They want validation. If the signs validate their choice, say so explicitly. If not, help them see what they might be missing.\n\n");
    }
    if analysis.wants_warning {
        out.push_str("PSYCHOLOGICAL NOTE: They are already worried something is wrong. If the signs confirm it, validate their intuition. If the signs are positive, help them release the worry.\n\n");
    }

    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_i_marry() {
        let a = QuestionAnalyzer::new().analyze("Should I marry him?");
        assert_eq!(a.question_type, QuestionType::ShouldI);
        assert_eq!(a.domain, Domain::Relationship);
        assert!(a.wants_permission);
    }

    #[test]
    fn test_empty_question_defaults() {
        let a = QuestionAnalyzer::new().analyze("");
        assert_eq!(a.question_type, QuestionType::OpenEnded);
        assert_eq!(a.domain, Domain::General);
        assert_eq!(a.urgency, Urgency::Unknown);
        assert_eq!(a.sentiment, Sentiment::Neutral);
        assert!(!a.wants_permission && !a.wants_validation && !a.wants_warning);
        assert!(a.keywords.is_empty());
    }

    #[test]
    fn test_type_priority_order() {
        let analyzer = QuestionAnalyzer::new();
        assert_eq!(analyzer.analyze("Will it rain").question_type, QuestionType::WillIt);
        // "is it going to" is a will_it prefix and is checked before "is it"
        assert_eq!(
            analyzer.analyze("Is it going to work out?").question_type,
            QuestionType::WillIt
        );
        assert_eq!(analyzer.analyze("Is this the one?").question_type, QuestionType::IsThis);
        assert_eq!(analyzer.analyze("Am I ready").question_type, QuestionType::IsThis);
        assert_eq!(
            analyzer.analyze("What should I do next").question_type,
            QuestionType::WhatShould
        );
        assert_eq!(
            analyzer.analyze("Tell me, can I trust her?").question_type,
            QuestionType::YesNo
        );
        assert_eq!(
            analyzer.analyze("Tell me about my path").question_type,
            QuestionType::OpenEnded
        );
    }

    #[test]
    fn test_should_i_without_domain_is_decision() {
        let a = QuestionAnalyzer::new().analyze("Should I go");
        assert_eq!(a.domain, Domain::Decision);
    }

    #[test]
    fn test_domain_tie_prefers_relationship() {
        // one relationship hit ("wife") and one career hit ("job")
        let a = QuestionAnalyzer::new().analyze("my wife or my job");
        assert_eq!(a.domain, Domain::Relationship);
    }

    #[test]
    fn test_domain_strict_max() {
        let a = QuestionAnalyzer::new().analyze("Should I take the job offer at the company?");
        assert_eq!(a.domain, Domain::Career);
    }

    #[test]
    fn test_urgency_cascade() {
        let analyzer = QuestionAnalyzer::new();
        assert_eq!(analyzer.analyze("Will he call today").urgency, Urgency::Immediate);
        assert_eq!(analyzer.analyze("Will it happen this month").urgency, Urgency::NearFuture);
        assert_eq!(analyzer.analyze("Will I find love eventually").urgency, Urgency::LongTerm);
        assert_eq!(analyzer.analyze("Is it right").urgency, Urgency::Unknown);
    }

    #[test]
    fn test_sentiment() {
        let analyzer = QuestionAnalyzer::new();
        assert_eq!(analyzer.analyze("I hope it works").sentiment, Sentiment::Hopeful);
        assert_eq!(analyzer.analyze("I'm scared and worried").sentiment, Sentiment::Fearful);
        assert_eq!(analyzer.analyze("I feel torn").sentiment, Sentiment::Confused);
        // hope vs fear tie with a confused word present
        assert_eq!(
            analyzer.analyze("I hope but I'm afraid, I feel torn").sentiment,
            Sentiment::Confused
        );
        assert_eq!(analyzer.analyze("Is it blue").sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_needs_flags_independent() {
        let a = QuestionAnalyzer::new().analyze("Is this a mistake I will regret?");
        assert!(a.wants_validation);
        assert!(a.wants_warning);
    }

    #[test]
    fn test_keywords_order_and_duplicates() {
        let a = QuestionAnalyzer::new().analyze("Should I really leave Boston, Boston again?");
        assert_eq!(a.keywords, vec!["leave", "boston,", "boston", "again?"]);
    }

    #[test]
    fn test_guidance_sections() {
        let a = QuestionAnalyzer::new().analyze("Should I marry him?");
        let g = guidance(&a);
        assert!(g.contains("PERMISSION"));
        assert!(g.contains("RELATIONSHIP READING"));
        assert!(g.contains("They want permission"));
    }

    #[test]
    fn test_guidance_empty_for_plain_question() {
        let a = QuestionAnalyzer::new().analyze("tell me");
        assert!(guidance(&a).is_empty());
    }
}
