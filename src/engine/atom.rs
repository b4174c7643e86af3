use std::collections::HashMap;
use std::fmt::Display;

use crate::models::Term;

/// Expression stored in, or submitted to, the atom space
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Symbol(String),
    Str(String),
    Variable(String),
    Expr(Vec<Atom>),
}

impl Atom {
    pub fn sym(name: impl Into<String>) -> Self {
        Atom::Symbol(name.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Atom::Variable(name.into())
    }

    /// Head symbol of an expression, e.g. `watched` in `(watched alice m1)`
    pub fn head(&self) -> Option<&str> {
        match self {
            Atom::Expr(items) => match items.first() {
                Some(Atom::Symbol(name)) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }

    /// Splits a `(= head body)` rule into its parts
    pub fn as_rule(&self) -> Option<(&Atom, &Atom)> {
        match self {
            Atom::Expr(items) if items.len() == 3 && self.head() == Some("=") => {
                Some((&items[1], &items[2]))
            }
            _ => None,
        }
    }

    /// Text of a ground leaf. Strings and symbols compare by text.
    fn leaf_text(&self) -> Option<&str> {
        match self {
            Atom::Symbol(s) | Atom::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Variables in order of first appearance
    pub fn variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<String>) {
        match self {
            Atom::Variable(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Atom::Expr(items) => items.iter().for_each(|item| item.collect_variables(out)),
            _ => {}
        }
    }

    /// Renames every variable by appending `suffix`
    pub fn rename_variables(&self, suffix: &str) -> Atom {
        match self {
            Atom::Variable(name) => Atom::Variable(format!("{}#{}", name, suffix)),
            Atom::Expr(items) => {
                Atom::Expr(items.iter().map(|i| i.rename_variables(suffix)).collect())
            }
            other => other.clone(),
        }
    }

    pub fn to_term(&self) -> Term {
        match self {
            Atom::Symbol(s) | Atom::Str(s) => Term::Primitive(s.clone()),
            Atom::Variable(name) => Term::Primitive(format!("${}", name)),
            Atom::Expr(items) => Term::Compound(items.iter().map(Atom::to_term).collect()),
        }
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Atom::Symbol(s) => write!(f, "{}", s),
            Atom::Str(s) => write!(f, "{:?}", s),
            Atom::Variable(name) => write!(f, "${}", name),
            Atom::Expr(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Variable assignments produced by unification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings(HashMap<String, Atom>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows variable-to-variable chains to the final value
    fn walk<'a>(&'a self, atom: &'a Atom) -> &'a Atom {
        let mut current = atom;
        while let Atom::Variable(name) = current {
            match self.0.get(name) {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// Substitutes bound variables throughout `atom`
    pub fn apply(&self, atom: &Atom) -> Atom {
        match self.walk(atom) {
            Atom::Expr(items) => Atom::Expr(items.iter().map(|i| self.apply(i)).collect()),
            other => other.clone(),
        }
    }

    pub fn resolve(&self, name: &str) -> Atom {
        self.apply(&Atom::Variable(name.to_string()))
    }

    /// Unifies `left` with `right`, extending these bindings on success
    pub fn unify(mut self, left: &Atom, right: &Atom) -> Option<Bindings> {
        let left = self.walk(left).clone();
        let right = self.walk(right).clone();

        match (&left, &right) {
            (Atom::Variable(a), Atom::Variable(b)) if a == b => Some(self),
            (Atom::Variable(name), other) | (other, Atom::Variable(name)) => {
                self.0.insert(name.clone(), other.clone());
                Some(self)
            }
            (Atom::Expr(xs), Atom::Expr(ys)) => {
                if xs.len() != ys.len() {
                    return None;
                }
                xs.iter()
                    .zip(ys.iter())
                    .try_fold(self, |bindings, (x, y)| bindings.unify(x, y))
            }
            _ => match (left.leaf_text(), right.leaf_text()) {
                (Some(a), Some(b)) if a == b => Some(self),
                _ => None,
            },
        }
    }
}
