//! Reader for the knowledge base's prefix-expression syntax.
//!
//! ```text
//! ; comment
//! (movie m1 "The Matrix" sci-fi wachowski 8.7)
//! (= (likes-genre $u $g) (match &self (preference $u $g) $g))
//! !(watched alice $movie)
//! ```

use super::atom::Atom;
use crate::error::EngineError;

/// A top-level item of a program
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Added to the atom space
    Fact(Atom),
    /// `!`-prefixed, evaluated against the atom space
    Query(Atom),
}

/// Parses every top-level statement of `source`
pub fn parse_program(source: &str) -> Result<Vec<Statement>, EngineError> {
    let mut reader = Reader::new(source);
    let mut statements = Vec::new();

    loop {
        reader.skip_trivia();
        let Some(c) = reader.peek() else {
            break;
        };
        if c == '!' {
            reader.bump();
            reader.skip_trivia();
            statements.push(Statement::Query(reader.atom()?));
        } else {
            statements.push(Statement::Fact(reader.atom()?));
        }
    }

    Ok(statements)
}

/// Parses exactly one atom
pub fn parse_atom(source: &str) -> Result<Atom, EngineError> {
    let mut reader = Reader::new(source);
    reader.skip_trivia();
    let atom = reader.atom()?;
    reader.skip_trivia();
    if reader.peek().is_some() {
        return Err(reader.error("trailing input after atom"));
    }
    Ok(atom)
}

struct Reader<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: &str) -> EngineError {
        EngineError::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn atom(&mut self) -> Result<Atom, EngineError> {
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('(') => self.expr(),
            Some(')') => Err(self.error("unbalanced ')'")),
            Some('"') => self.string(),
            Some('$') => {
                self.bump();
                let name = self.token();
                if name.is_empty() {
                    return Err(self.error("variable without a name"));
                }
                Ok(Atom::Variable(name.to_string()))
            }
            Some(_) => Ok(Atom::Symbol(self.token().to_string())),
        }
    }

    fn expr(&mut self) -> Result<Atom, EngineError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(self.error("unclosed '('")),
                Some(')') => {
                    self.bump();
                    return Ok(Atom::Expr(items));
                }
                Some(_) => items.push(self.atom()?),
            }
        }
    }

    fn string(&mut self) -> Result<Atom, EngineError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some('"') => return Ok(Atom::Str(value)),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c) => value.push(c),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn token(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '(' || c == ')' || c == '"' || c == ';' {
                break;
            }
            self.bump();
        }
        let source = self.source;
        &source[start..self.pos]
    }
}
