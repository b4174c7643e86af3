use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lowest search depth an intent may carry
pub const MIN_DEPTH: u8 = 1;
/// Highest search depth an intent may carry
pub const MAX_DEPTH: u8 = 5;

/// Placeholder the oracle echoes back from the schema when it has no value
pub const PLACEHOLDER_VALUE: &str = "<string>";

/// Relation a question asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "any")]
    Any,
    Watched,
    Likes,
    SimilarUser,
}

impl Relation {
    /// Maps an oracle label to a relation. Unknown labels mean "any".
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "watched" => Relation::Watched,
            "likes" => Relation::Likes,
            "similaruser" | "similar_user" | "similar-user" => Relation::SimilarUser,
            _ => Relation::Any,
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Relation::Any => "any",
            Relation::Watched => "Watched",
            Relation::Likes => "Likes",
            Relation::SimilarUser => "SimilarUser",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeType {
    Genre,
    Director,
}

impl AttributeType {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "genre" => Some(AttributeType::Genre),
            "director" => Some(AttributeType::Director),
            _ => None,
        }
    }
}

/// Attribute a question is narrowed to, e.g. `Genre = sci-fi`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAttribute {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub value: String,
}

impl TargetAttribute {
    /// Builds a target with a lower-cased value. A blank value or the schema
    /// placeholder yields `None`.
    pub fn new(kind: AttributeType, value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        if value.is_empty() || value == PLACEHOLDER_VALUE {
            return None;
        }
        Some(Self { kind, value })
    }

    pub fn genre(value: &str) -> Option<Self> {
        Self::new(AttributeType::Genre, value)
    }
}

/// Structured form of a natural-language question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub subject: Option<String>,
    pub relation: Relation,
    pub target_attribute: Option<TargetAttribute>,
    pub max_depth: u8,
}

impl Intent {
    pub fn new(subject: Option<&str>, relation: Relation) -> Self {
        Self {
            subject: normalize_subject(subject),
            relation,
            target_attribute: None,
            max_depth: MIN_DEPTH,
        }
    }

    pub fn with_target(mut self, target: Option<TargetAttribute>) -> Self {
        self.target_attribute = target;
        self
    }

    pub fn with_depth(mut self, depth: i64) -> Self {
        self.max_depth = clamp_depth(depth);
        self
    }

    /// Genre value when the intent targets a genre
    pub fn genre(&self) -> Option<&str> {
        self.target_attribute
            .as_ref()
            .filter(|t| t.kind == AttributeType::Genre)
            .map(|t| t.value.as_str())
    }
}

/// Lower-cases a subject, treating blank as absent
pub fn normalize_subject(subject: Option<&str>) -> Option<String> {
    subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

pub fn clamp_depth(depth: i64) -> u8 {
    depth.clamp(MIN_DEPTH as i64, MAX_DEPTH as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_labels() {
        assert_eq!(Relation::from_label("Watched"), Relation::Watched);
        assert_eq!(Relation::from_label("likes"), Relation::Likes);
        assert_eq!(Relation::from_label("SimilarUser"), Relation::SimilarUser);
        assert_eq!(Relation::from_label("any"), Relation::Any);
        assert_eq!(Relation::from_label("Recommends"), Relation::Any);
    }

    #[test]
    fn test_target_placeholder_is_absent() {
        assert!(TargetAttribute::genre("<string>").is_none());
        assert!(TargetAttribute::genre("<STRING>").is_none());
        assert!(TargetAttribute::genre("   ").is_none());
        assert_eq!(
            TargetAttribute::genre("Sci-Fi").unwrap().value,
            "sci-fi".to_string()
        );
    }

    #[test]
    fn test_depth_clamps() {
        let intent = Intent::new(Some("alice"), Relation::Any);
        assert_eq!(intent.clone().with_depth(99).max_depth, 5);
        assert_eq!(intent.clone().with_depth(0).max_depth, 1);
        assert_eq!(intent.with_depth(-3).max_depth, 1);
    }

    #[test]
    fn test_intent_serializes_like_oracle_schema() {
        let intent = Intent::new(Some("Alice"), Relation::Likes)
            .with_target(TargetAttribute::genre("sci-fi"));
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "subject": "alice",
                "relation": "Likes",
                "target_attribute": {"type": "Genre", "value": "sci-fi"},
                "max_depth": 1
            })
        );

        let any = serde_json::to_value(Intent::new(None, Relation::Any)).unwrap();
        assert_eq!(any["relation"], "any");
        assert!(any["subject"].is_null());
    }

    #[test]
    fn test_genre_only_for_genre_targets() {
        let director = Intent::new(Some("bob"), Relation::Likes).with_target(
            TargetAttribute::new(AttributeType::Director, "Nolan"),
        );
        assert_eq!(director.genre(), None);
    }
}
