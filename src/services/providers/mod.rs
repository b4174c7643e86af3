//! Language-model oracle abstraction
//!
//! The intent parser asks an oracle to turn a question into JSON. Oracles are
//! optional and unreliable: the parser treats any failure here as a signal to
//! fall back to rule-based parsing.
use serde_json::Value;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::OracleError;

pub mod gemini;

pub use gemini::GeminiOracle;

/// Trait for language-model oracles
///
/// Responses are returned as loosely-typed JSON because providers disagree on
/// where the generated text lives; [`extract_text`] knows the known shapes.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LanguageOracle: Send + Sync {
    /// Send a single prompt and return the raw response body
    async fn generate(&self, prompt: &str) -> Result<Value, OracleError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

type Extractor = fn(&Value) -> Option<String>;

/// Text extraction strategies, tried in order; first success wins
const EXTRACTORS: &[(&str, Extractor)] = &[
    ("candidate_parts", candidate_parts_text),
    ("candidate_text", candidate_text),
    ("direct_text", direct_text),
];

/// `candidates[0].content.parts[0].text`
fn candidate_parts_text(response: &Value) -> Option<String> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// A candidate carrying its text directly, or as a bare string
fn candidate_text(response: &Value) -> Option<String> {
    let candidate = response.pointer("/candidates/0")?;
    candidate
        .get("text")
        .and_then(Value::as_str)
        .or_else(|| candidate.get("content").and_then(Value::as_str))
        .or_else(|| candidate.as_str())
        .map(str::to_string)
}

/// A top-level `text` field, or a response that is itself a string
fn direct_text(response: &Value) -> Option<String> {
    response
        .get("text")
        .and_then(Value::as_str)
        .or_else(|| response.as_str())
        .map(str::to_string)
}

/// Pulls the generated text out of an oracle response
///
/// A response with no generated text (e.g. a reply blocked for safety) is a
/// failure; the envelope itself is never parsed as an intent.
pub fn extract_text(response: &Value) -> Result<String, OracleError> {
    for (name, extractor) in EXTRACTORS {
        if let Some(text) = extractor(response).filter(|t| !t.trim().is_empty()) {
            tracing::debug!(strategy = *name, "Extracted oracle text");
            return Ok(text.trim().to_string());
        }
    }
    tracing::debug!("No known text field in oracle response");
    Err(OracleError::MissingJson(preview(&response.to_string())))
}

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^```(?:json)?\s*|\s*```$").expect("code fence pattern is valid")
});

/// Strips Markdown code fences and isolates the span from the first `{` to
/// the last `}`
pub fn isolate_json(text: &str) -> Result<&str, OracleError> {
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(i), Some(j)) if j > i => Ok(&text[i..=j]),
        _ => Err(OracleError::MissingJson(preview(text))),
    }
}

/// Full cleanup of an oracle response down to its JSON object text
pub fn json_payload(response: &Value) -> Result<String, OracleError> {
    let text = extract_text(response)?;
    let cleaned = CODE_FENCE.replace_all(&text, "");
    isolate_json(cleaned.trim()).map(str::to_string)
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}
