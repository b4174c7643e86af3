use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod intent;
pub mod movie;
pub mod term;

pub use intent::{AttributeType, Intent, Relation, TargetAttribute};
pub use movie::MovieRecord;
pub use term::Term;

/// True when `value` can be spliced into a fact or query as one symbol
///
/// Whitespace, brackets, quotes and the `;`, `$` and `!` markers would change
/// the shape of the surrounding expression.
pub fn is_symbol(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';' | '$' | '!'))
}

/// Explanations per movie, in the same order as the movies they explain
pub type ExplanationBundle = Vec<Vec<String>>;

/// Deduplicated plain values flattened out of engine output.
///
/// Semantically unordered; iteration happens in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawResultSet(BTreeSet<String>);

impl RawResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, ignoring blanks
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.0.insert(value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }

    /// Re-expresses the set as engine output, one primitive per value
    pub fn to_terms(&self) -> Vec<Term> {
        self.0.iter().cloned().map(Term::Primitive).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for RawResultSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = RawResultSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for RawResultSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Everything the recommendation page shows for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<MovieRecord>,
    pub explanations: ExplanationBundle,
    pub similar_users: Vec<String>,
    pub watched: Vec<MovieRecord>,
}

/// Answer to a free-text question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnswer {
    pub parsed_query: Intent,
    pub recommendations: Vec<MovieRecord>,
    pub explanations: ExplanationBundle,
}
