//! Question analysis types

use serde::{Deserialize, Serialize};

/// Shape of the question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    YesNo,
    ShouldI,
    WillIt,
    WhatShould,
    IsThis,
    OpenEnded,
}

/// Life area the question is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Relationship,
    Career,
    Health,
    Spiritual,
    Financial,
    Decision,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Immediate,
    NearFuture,
    LongTerm,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Hopeful,
    Fearful,
    Neutral,
    Confused,
}

/// Structured attributes derived from the free-text question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnalysis {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub domain: Domain,
    pub urgency: Urgency,
    pub sentiment: Sentiment,
    pub wants_permission: bool,
    pub wants_validation: bool,
    pub wants_warning: bool,
    /// Personalization tokens, in question order, duplicates kept
    pub keywords: Vec<String>,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::YesNo => "yes_no",
            QuestionType::ShouldI => "should_i",
            QuestionType::WillIt => "will_it",
            QuestionType::WhatShould => "what_should",
            QuestionType::IsThis => "is_this",
            QuestionType::OpenEnded => "open_ended",
        }
    }
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Relationship => "relationship",
            Domain::Career => "career",
            Domain::Health => "health",
            Domain::Spiritual => "spiritual",
            Domain::Financial => "financial",
            Domain::Decision => "decision",
            Domain::General => "general",
        }
    }
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Immediate => "immediate",
            Urgency::NearFuture => "near_future",
            Urgency::LongTerm => "long_term",
            Urgency::Unknown => "unknown",
        }
    }
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Hopeful => "hopeful",
            Sentiment::Fearful => "fearful",
            Sentiment::Neutral => "neutral",
            Sentiment::Confused => "confused",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
