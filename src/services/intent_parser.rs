use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

use crate::{
    error::{AppError, AppResult, OracleError},
    models::{
        intent::normalize_subject, is_symbol, AttributeType, Intent, Relation, TargetAttribute,
    },
    services::providers::{json_payload, LanguageOracle},
};

/// Instruction sent ahead of every question
pub const SCHEMA: &str = concat!(
    "Reply with ONLY one JSON object like: ",
    r#"{"subject":<string|null>,"relation":"any"|"Watched"|"Likes"|"SimilarUser","#,
    r#""target_attribute":{"type":"Genre"|"Director","value":"<string>"},"max_depth":<int>}"#
);

static DOES_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Does (\w+) like (\w+(?:[- ]?\w+)*) movies\??").expect("valid pattern")
});

static WHAT_WATCHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^What movies has (\w+) watched\??").expect("valid pattern")
});

static SIMILAR_TO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Who are similar to (\w+)\??").expect("valid pattern"));

/// Turns free-text questions into [`Intent`]s
///
/// Uses the language-model oracle when one is configured and falls back to a
/// small set of fixed question templates whenever the oracle is missing or
/// its answer cannot be used.
#[derive(Clone, Default)]
pub struct IntentParser {
    oracle: Option<Arc<dyn LanguageOracle>>,
}

impl IntentParser {
    pub fn new(oracle: Option<Arc<dyn LanguageOracle>>) -> Self {
        Self { oracle }
    }

    /// Parser that never calls out to a language model
    pub fn rule_based() -> Self {
        Self::default()
    }

    /// Parses a question, assuming `assumed_subject` when none is named
    ///
    /// Only a blank question is an error; every oracle failure degrades to the
    /// rule-based parse.
    pub async fn parse(&self, question: &str, assumed_subject: Option<&str>) -> AppResult<Intent> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::EmptyInput);
        }

        let Some(oracle) = &self.oracle else {
            tracing::debug!("No language model configured, using fallback parser");
            return Ok(fallback_parse(question, assumed_subject));
        };

        match parse_with_oracle(oracle.as_ref(), question, assumed_subject).await {
            Ok(intent) => {
                tracing::info!(
                    provider = oracle.name(),
                    relation = %intent.relation,
                    subject = ?intent.subject,
                    "Question parsed by language model"
                );
                Ok(intent)
            }
            Err(e) => {
                tracing::warn!(
                    provider = oracle.name(),
                    error = %e,
                    "Language model parsing failed, switching to fallback parser"
                );
                Ok(fallback_parse(question, assumed_subject))
            }
        }
    }
}

/// Builds the oracle prompt for a question
pub fn build_prompt(question: &str, assumed_subject: Option<&str>) -> String {
    let hint = assumed_subject
        .map(|s| format!("(Assume subject: {}) ", s))
        .unwrap_or_default();
    format!("{}\n\nUser question: {}{}", SCHEMA, hint, question.trim())
}

async fn parse_with_oracle(
    oracle: &dyn LanguageOracle,
    question: &str,
    assumed_subject: Option<&str>,
) -> Result<Intent, OracleError> {
    let response = oracle.generate(&build_prompt(question, assumed_subject)).await?;
    let payload = json_payload(&response)?;
    let raw: OracleIntent = serde_json::from_str(&payload)?;
    raw.into_intent(assumed_subject)
}

/// Intent exactly as the oracle wrote it, before normalization
#[derive(Debug, Deserialize)]
struct OracleIntent {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    relation: Option<String>,
    #[serde(default)]
    target_attribute: Option<OracleTarget>,
    #[serde(default, deserialize_with = "present_value")]
    max_depth: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; only a missing key is `None`
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
struct OracleTarget {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

impl OracleIntent {
    fn into_intent(self, assumed_subject: Option<&str>) -> Result<Intent, OracleError> {
        if self.subject.is_none() && self.relation.is_none() {
            return Err(OracleError::InvalidIntent(
                "neither subject nor relation present".to_string(),
            ));
        }

        let subject = normalize_subject(self.subject.as_deref())
            .or_else(|| normalize_subject(assumed_subject));
        if let Some(subject) = &subject {
            ensure_symbol("subject", subject)?;
        }

        let relation = self
            .relation
            .as_deref()
            .map(Relation::from_label)
            .unwrap_or(Relation::Any);

        let target = self.target_attribute.and_then(|t| {
            let kind = AttributeType::from_label(t.kind.as_deref()?)?;
            TargetAttribute::new(kind, t.value.as_deref()?)
        });

        if let Some(target) = &target {
            ensure_symbol("target value", &target.value)?;
        }

        // Absent means 1; an explicit null is not a depth
        let depth = match self.max_depth {
            None => 1,
            Some(value) => depth_from_value(&value)?,
        };

        Ok(Intent::new(subject.as_deref(), relation)
            .with_target(target)
            .with_depth(depth))
    }
}

/// Oracle values end up inside knowledge base queries
fn ensure_symbol(field: &str, value: &str) -> Result<(), OracleError> {
    if is_symbol(value) {
        Ok(())
    } else {
        Err(OracleError::InvalidIntent(format!("{} is not a single symbol: {:?}", field, value)))
    }
}

fn depth_from_value(value: &Value) -> Result<i64, OracleError> {
    let depth = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    depth.ok_or_else(|| OracleError::InvalidIntent(format!("max_depth is not an integer: {}", value)))
}

/// Rule-based parse over the fixed question templates
pub fn fallback_parse(question: &str, assumed_subject: Option<&str>) -> Intent {
    let question = question.trim();

    if let Some(caps) = DOES_LIKE.captures(question) {
        let genre = caps[2].replace(' ', "-");
        return Intent::new(Some(&caps[1]), Relation::Likes)
            .with_target(TargetAttribute::genre(&genre));
    }

    if let Some(caps) = WHAT_WATCHED.captures(question) {
        return Intent::new(Some(&caps[1]), Relation::Watched);
    }

    if let Some(caps) = SIMILAR_TO.captures(question) {
        return Intent::new(Some(&caps[1]), Relation::SimilarUser);
    }

    tracing::debug!(question = %question, "No question template matched");
    Intent::new(assumed_subject, Relation::Any)
}
