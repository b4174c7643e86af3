//! Reasoning engine abstraction
//!
//! The core only ever talks to the knowledge base through [`ReasoningEngine`]:
//! it builds query strings (see [`query`]) and interprets the loosely-typed
//! [`Term`] output. [`AtomSpace`] is the in-process implementation loaded
//! from a knowledge base file at startup.
use crate::{error::EngineError, models::Term};

pub mod atom;
pub mod parser;
pub mod query;
pub mod space;

pub use space::AtomSpace;

/// Trait for fact/rule evaluators
///
/// A program is one or more prefix expressions. `!`-prefixed expressions are
/// queries and each contributes one [`Term::Sequence`] of results to the
/// output; unprefixed expressions are facts to insert and contribute nothing.
#[cfg_attr(test, mockall::automock)]
pub trait ReasoningEngine: Send + Sync {
    fn run(&self, program: &str) -> Result<Vec<Term>, EngineError>;
}
