//! Session-scoped literal store.

use crate::automaton::Automaton;
use indexmap::IndexMap;
use std::fmt;

/// A named value held by the environment: a plain string or a defined
/// machine. Aliasing another literal copies its value at define time;
/// the environment never stores references.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Machine(Automaton),
}

impl Literal {
    /// The machine inside, if this literal is one.
    pub fn as_machine(&self) -> Option<&Automaton> {
        match self {
            Literal::Machine(machine) => Some(machine),
            Literal::Str(_) => None,
        }
    }

    /// The string inside, if this literal is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            Literal::Machine(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "{s}"),
            Literal::Machine(machine) => write!(f, "{machine}"),
        }
    }
}

/// Ordered name→literal store for one session.
///
/// Redefining a name replaces its value in place: the name keeps its
/// original position in iteration order. There is no removal; the store
/// lives exactly as long as the session.
#[derive(Debug, Default)]
pub struct Environment {
    literals: IndexMap<String, Literal>,
}

impl Environment {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any existing binding in place.
    pub fn define(&mut self, name: impl Into<String>, value: Literal) {
        self.literals.insert(name.into(), value);
    }

    /// Look up a literal by name.
    pub fn get(&self, name: &str) -> Option<&Literal> {
        self.literals.get(name)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether the store holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Iterate bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.literals.iter().map(|(name, value)| (name.as_str(), value))
    }
}
