use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use super::atom::{Atom, Bindings};
use super::parser::{parse_program, Statement};
use super::ReasoningEngine;
use crate::error::EngineError;
use crate::models::Term;

/// Deepest chain of rule rewrites a single query may trigger
const MAX_EVAL_DEPTH: usize = 32;

/// In-process knowledge base of facts and `(= head body)` rules.
///
/// Queries take the read lock, fact insertion the write lock.
#[derive(Debug, Default)]
pub struct AtomSpace {
    atoms: RwLock<Vec<Atom>>,
    rename_counter: AtomicUsize,
}

impl AtomSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a space by running `source` as a program
    pub fn from_source(source: &str) -> Result<Self, EngineError> {
        let space = Self::new();
        space.run(source)?;
        Ok(space)
    }

    /// Loads a knowledge base file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let space = Self::from_source(&source)?;

        tracing::info!(
            path = %path.display(),
            atoms = space.len(),
            "Loaded knowledge base"
        );

        Ok(space)
    }

    fn len(&self) -> usize {
        self.atoms.read().map(|atoms| atoms.len()).unwrap_or(0)
    }

    fn add(&self, atom: Atom) -> Result<(), EngineError> {
        let mut atoms = self.atoms.write().map_err(|_| EngineError::Poisoned)?;
        if !atoms.contains(&atom) {
            atoms.push(atom);
        }
        Ok(())
    }

    fn evaluate(&self, query: &Atom) -> Result<Vec<Atom>, EngineError> {
        let atoms = self.atoms.read().map_err(|_| EngineError::Poisoned)?;
        let eval = Evaluator {
            atoms: &atoms,
            rename_counter: &self.rename_counter,
        };
        eval.eval(query, 0)
    }
}

impl ReasoningEngine for AtomSpace {
    fn run(&self, program: &str) -> Result<Vec<Term>, EngineError> {
        let mut output = Vec::new();

        for statement in parse_program(program)? {
            match statement {
                Statement::Fact(atom) => self.add(atom)?,
                Statement::Query(query) => {
                    let results = self.evaluate(&query)?;
                    output.push(Term::Sequence(results.iter().map(Atom::to_term).collect()));
                }
            }
        }

        Ok(output)
    }
}

struct Evaluator<'a> {
    atoms: &'a [Atom],
    rename_counter: &'a AtomicUsize,
}

impl Evaluator<'_> {
    fn eval(&self, query: &Atom, depth: usize) -> Result<Vec<Atom>, EngineError> {
        if depth > MAX_EVAL_DEPTH {
            return Err(EngineError::DepthExceeded(MAX_EVAL_DEPTH));
        }

        match query {
            Atom::Expr(_) if query.head() == Some("match") => self.eval_match(query),
            Atom::Expr(_) => self.eval_call(query, depth),
            other => Ok(vec![other.clone()]),
        }
    }

    /// `(match &self PATTERN TEMPLATE)`
    fn eval_match(&self, query: &Atom) -> Result<Vec<Atom>, EngineError> {
        let Atom::Expr(items) = query else {
            return Ok(Vec::new());
        };
        let [_, _space, pattern, template] = items.as_slice() else {
            return Err(EngineError::MalformedQuery(format!(
                "match expects a space, a pattern and a template: {}",
                query
            )));
        };

        Ok(self
            .solve(pattern, Bindings::new())
            .iter()
            .map(|bindings| bindings.apply(template))
            .collect())
    }

    /// All bindings under which `pattern` holds. `(, p1 p2 ...)` is a conjunction.
    fn solve(&self, pattern: &Atom, bindings: Bindings) -> Vec<Bindings> {
        if let Atom::Expr(items) = pattern {
            if pattern.head() == Some(",") {
                return items[1..].iter().fold(vec![bindings], |solutions, goal| {
                    solutions
                        .into_iter()
                        .flat_map(|b| self.solve(goal, b))
                        .collect()
                });
            }
        }

        self.atoms
            .iter()
            .filter_map(|atom| bindings.clone().unify(pattern, atom))
            .collect()
    }

    fn eval_call(&self, call: &Atom, depth: usize) -> Result<Vec<Atom>, EngineError> {
        let mut results = Vec::new();
        let mut rule_applied = false;

        for atom in self.atoms {
            let Some((head, body)) = atom.as_rule() else {
                continue;
            };
            let suffix = self.rename_counter.fetch_add(1, Ordering::Relaxed).to_string();
            let head = head.rename_variables(&suffix);
            let Some(bindings) = Bindings::new().unify(&head, call) else {
                continue;
            };
            rule_applied = true;
            let body = bindings.apply(&body.rename_variables(&suffix));
            results.extend(self.eval(&body, depth + 1)?);
        }

        if rule_applied {
            return Ok(results);
        }

        // No rule: answer from stored facts with the call's variable values
        let variables = call.variables();
        Ok(self
            .atoms
            .iter()
            .filter(|atom| atom.as_rule().is_none())
            .filter_map(|atom| Bindings::new().unify(call, atom).map(|b| (atom, b)))
            .map(|(fact, bindings)| match variables.as_slice() {
                [] => fact.clone(),
                [only] => bindings.resolve(only),
                many => Atom::Expr(many.iter().map(|v| bindings.resolve(v)).collect()),
            })
            .collect())
    }
}
