use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A single value returned by the reasoning engine.
///
/// The engine hands back loosely-typed output: flat atoms, compound terms
/// with ordered sub-terms, collections of results (possibly nested), and
/// absent values. Consumers pattern-match on this instead of probing shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Term {
    Primitive(String),
    Compound(Vec<Term>),
    Sequence(Vec<Term>),
    Null,
}

impl Term {
    pub fn primitive(value: impl Into<String>) -> Self {
        Term::Primitive(value.into())
    }

    /// Sub-terms of a compound term
    pub fn children(&self) -> Option<&[Term]> {
        match self {
            Term::Compound(children) => Some(children),
            _ => None,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Primitive(value) => write!(f, "{}", value),
            Term::Compound(children) => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
            Term::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Term::Null => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_compound() {
        let term = Term::Compound(vec![
            Term::primitive("movie"),
            Term::primitive("m1"),
            Term::primitive("The Matrix"),
        ]);
        assert_eq!(term.to_string(), "(movie m1 The Matrix)");
    }

    #[test]
    fn test_display_sequence() {
        let term = Term::Sequence(vec![Term::primitive("a"), Term::Null]);
        assert_eq!(term.to_string(), "[a, None]");
    }

    #[test]
    fn test_children() {
        let term = Term::Compound(vec![Term::primitive("x")]);
        assert_eq!(term.children().map(<[Term]>::len), Some(1));
        assert!(Term::primitive("x").children().is_none());
    }
}
