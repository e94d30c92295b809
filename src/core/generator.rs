//! Text generation: the external collaborator and its output parsing
//!
//! The generator only ever sees the rendered prompt. Whatever comes back is
//! parsed leniently and the verdict is forced back in line with the engine's
//! final lean.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::types::{GeneratedReading, Lean, TemplateKind};
use crate::{OraklError, MAX_VERDICT_CHARS};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// One prompt for the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_output_tokens: u32,
}

/// Anything that turns a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, OraklError>;
}

/// Messages API client
pub struct AnthropicGenerator {
    client: Client,
    api_url: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicGenerator {
    pub fn new(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OraklError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    /// Build from config; the key comes from the configured env variable
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, OraklError> {
        let api_key = config.api_key()?;
        Self::new(
            config.api_url.clone(),
            config.model.clone(),
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, OraklError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: request.max_output_tokens,
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        debug!(
            "Calling {} ({} prompt chars, max_tokens={})",
            self.model,
            request.prompt.len(),
            request.max_output_tokens
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OraklError::GenerationStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| OraklError::Generation("response had no text content".to_string()))
    }
}

/// First balanced `{...}` block, ignoring braces inside JSON strings
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[derive(Deserialize)]
struct RawReading {
    #[serde(default)]
    reading: Option<String>,
    #[serde(default)]
    verdict: Option<String>,
}

/// Parse generator output, falling back to raw text + canned verdict
pub fn parse_generation(raw: &str, final_lean: Lean, template: TemplateKind) -> GeneratedReading {
    let parsed = extract_json_block(raw).and_then(|block| serde_json::from_str::<RawReading>(block).ok());

    let (reading, verdict, well_formed) = match parsed {
        Some(RawReading {
            reading: Some(reading),
            verdict,
        }) if !reading.trim().is_empty() => {
            let complete = verdict.as_ref().is_some_and(|v| !v.trim().is_empty());
            (reading, verdict.unwrap_or_default(), complete)
        }
        _ => (raw.trim().to_string(), String::new(), false),
    };

    if !well_formed {
        warn!("Generator output was malformed, using fallback verdict");
    }

    GeneratedReading {
        reading: reading.trim().to_string(),
        verdict: sanitize_verdict(&verdict, final_lean, template),
        well_formed,
    }
}

/// Trim, cap and align a verdict with the final lean
pub fn sanitize_verdict(verdict: &str, final_lean: Lean, template: TemplateKind) -> String {
    let verdict = verdict.trim();

    if template == TemplateKind::Insufficient {
        if verdict.is_empty() || leading_verdict_word(verdict).is_some() {
            return Lean::Insufficient.fallback_verdict().to_string();
        }
        return truncate_chars(verdict, MAX_VERDICT_CHARS);
    }

    let Some(word) = final_lean.verdict_word() else {
        return truncate_chars(verdict, MAX_VERDICT_CHARS);
    };

    if verdict.is_empty() {
        return final_lean.fallback_verdict().to_string();
    }

    let aligned = match leading_verdict_word(verdict) {
        Some(found) if found == word => verdict.to_string(),
        Some(found) => {
            let rest = strip_separator(&verdict[found.len()..]);
            join_verdict(word, rest)
        }
        None => join_verdict(word, verdict),
    };

    truncate_chars(&aligned, MAX_VERDICT_CHARS)
}

/// Directional word opening the verdict, matched case-insensitively
fn leading_verdict_word(verdict: &str) -> Option<&'static str> {
    ["YES", "NO", "WAIT"].into_iter().find(|word| {
        let Some(head) = verdict.get(..word.len()) else {
            return false;
        };
        let boundary = verdict[word.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        head.eq_ignore_ascii_case(word) && boundary
    })
}

fn strip_separator(rest: &str) -> &str {
    rest.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '—' | '-' | '–' | ':' | ',' | '.' | '!'))
}

fn join_verdict(word: &str, rest: &str) -> String {
    if rest.is_empty() {
        word.to_string()
    } else {
        format!("{} — {}", word, rest)
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_block_with_prose() {
        let text = "Here you go:\n{\"reading\": \"a\", \"verdict\": \"b\"}\nBlessings.";
        assert_eq!(
            extract_json_block(text),
            Some("{\"reading\": \"a\", \"verdict\": \"b\"}")
        );
    }

    #[test]
    fn test_extract_block_ignores_braces_in_strings() {
        let text = r#"{"reading": "The {path} opens \"}\"", "verdict": "YES"} trailing }"#;
        assert_eq!(
            extract_json_block(text),
            Some(r#"{"reading": "The {path} opens \"}\"", "verdict": "YES"}"#)
        );
    }

    #[test]
    fn test_extract_block_unbalanced() {
        assert_eq!(extract_json_block("{\"reading\": \"cut off"), None);
        assert_eq!(extract_json_block("no json at all"), None);
    }

    #[test]
    fn test_parse_well_formed() {
        let raw = r#"{"reading": "The butterfly speaks.", "verdict": "YES — The path is clear"}"#;
        let out = parse_generation(raw, Lean::Yes, TemplateKind::Quick);
        assert!(out.well_formed);
        assert_eq!(out.reading, "The butterfly speaks.");
        assert_eq!(out.verdict, "YES — The path is clear");
    }

    #[test]
    fn test_parse_malformed_falls_back() {
        let raw = "The signs are gathering around you.";
        let out = parse_generation(raw, Lean::Wait, TemplateKind::Quick);
        assert!(!out.well_formed);
        assert_eq!(out.reading, raw);
        assert_eq!(out.verdict, "WAIT — Clarity is still forming");
    }

    #[test]
    fn test_parse_missing_verdict() {
        let raw = r#"{"reading": "Only a reading."}"#;
        let out = parse_generation(raw, Lean::No, TemplateKind::Deep);
        assert!(!out.well_formed);
        assert_eq!(out.reading, "Only a reading.");
        assert_eq!(out.verdict, "NO — The universe urges caution");
    }

    #[test]
    fn test_verdict_prefixed_when_missing() {
        assert_eq!(
            sanitize_verdict("Trust your instincts", Lean::Yes, TemplateKind::Quick),
            "YES — Trust your instincts"
        );
    }

    #[test]
    fn test_verdict_wrong_word_replaced() {
        assert_eq!(
            sanitize_verdict("YES - go for it", Lean::No, TemplateKind::Quick),
            "NO — go for it"
        );
    }

    #[test]
    fn test_verdict_word_boundary() {
        assert_eq!(
            sanitize_verdict("Not yet", Lean::Wait, TemplateKind::Quick),
            "WAIT — Not yet"
        );
        assert_eq!(
            sanitize_verdict("wait for the sign", Lean::Wait, TemplateKind::Quick),
            "wait for the sign"
        );
    }

    #[test]
    fn test_verdict_capped() {
        let long = format!("YES — {}", "a".repeat(300));
        let out = sanitize_verdict(&long, Lean::Yes, TemplateKind::Deep);
        assert_eq!(out.chars().count(), MAX_VERDICT_CHARS);
        assert!(out.starts_with("YES"));
    }

    #[test]
    fn test_insufficient_never_directional() {
        assert_eq!(
            sanitize_verdict("YES — go", Lean::Yes, TemplateKind::Insufficient),
            "The universe needs more signs"
        );
        assert_eq!(
            sanitize_verdict("Keep watching the skies", Lean::Insufficient, TemplateKind::Insufficient),
            "Keep watching the skies"
        );
        assert_eq!(
            sanitize_verdict("", Lean::Insufficient, TemplateKind::Insufficient),
            "The universe needs more signs"
        );
    }
}
