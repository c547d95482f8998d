//! Automaton value types and the deterministic acceptance check.

use indexmap::IndexSet;
use std::fmt;
use thiserror::Error;

/// One state of an automaton: its name plus the transition targets, one
/// per alphabet symbol, aligned with the alphabet's order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    name: String,
    transitions: Vec<String>,
}

impl State {
    /// Create a state. Arity against the alphabet is the validator's job.
    pub fn new(name: impl Into<String>, transitions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            transitions,
        }
    }

    /// Get the state's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the transition targets, in alphabet order.
    pub fn transitions(&self) -> &[String] {
        &self.transitions
    }
}

/// Result of running an automaton over an input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
}

/// An input character with no column in the automaton's alphabet.
///
/// This is not a verdict: the run aborts at the offending character and
/// no accept/reject answer exists.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("input symbol {symbol:?} at position {position} is not in the alphabet")]
pub struct AlphabetError {
    /// The unrecognized character.
    pub symbol: char,
    /// 0-based character position within the input.
    pub position: usize,
}

/// A validated deterministic finite automaton.
///
/// Built only by [`validate`](crate::automaton::validate), immutable
/// afterwards. The alphabet's order indexes transition columns and the
/// first state of the table is the start state, so both sequences are
/// order-significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    name: String,
    alphabet: Vec<String>,
    states: Vec<State>,
    accept_states: IndexSet<String>,
}

impl Automaton {
    /// Assemble a machine from already-checked parts.
    ///
    /// Invariants assumed (and guaranteed by the validator): `alphabet`
    /// and `states` are non-empty, and every state carries exactly one
    /// transition per alphabet symbol.
    pub(crate) fn new(
        name: String,
        alphabet: Vec<String>,
        states: Vec<State>,
        accept_states: IndexSet<String>,
    ) -> Self {
        Self {
            name,
            alphabet,
            states,
            accept_states,
        }
    }

    /// Get the automaton's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the alphabet symbols, in column order.
    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    /// Get the state table. The first entry is the start state.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Get the accept-state names.
    pub fn accept_states(&self) -> &IndexSet<String> {
        &self.accept_states
    }

    /// Check whether a state name is an accept state.
    pub fn is_accepting(&self, state_name: &str) -> bool {
        self.accept_states.contains(state_name)
    }

    /// Run the machine over `input` and report whether it accepts.
    ///
    /// The current state starts at the first table entry. Each input
    /// character selects a transition column by its position in the
    /// alphabet; a character with no column aborts with [`AlphabetError`].
    /// A transition target that names no state leaves the current state
    /// unchanged (such targets survive only lenient validation).
    ///
    /// Pure and deterministic: repeated calls with the same input always
    /// yield the same result.
    pub fn evaluate(&self, input: &str) -> Result<Verdict, AlphabetError> {
        // states is non-empty for any validated machine
        let mut current = &self.states[0];

        for (position, symbol) in input.chars().enumerate() {
            let Some(column) = self.symbol_index(symbol) else {
                return Err(AlphabetError { symbol, position });
            };

            let target = &current.transitions[column];
            if let Some(next) = self.states.iter().find(|s| s.name == *target) {
                current = next;
            }
        }

        if self.is_accepting(&current.name) {
            Ok(Verdict::Accept)
        } else {
            Ok(Verdict::Reject)
        }
    }

    /// Column index of a single-character symbol, if it is in the alphabet.
    /// Multi-character alphabet tokens never match an input character.
    fn symbol_index(&self, symbol: char) -> Option<usize> {
        let mut buf = [0u8; 4];
        let needle: &str = symbol.encode_utf8(&mut buf);
        self.alphabet.iter().position(|s| s == needle)
    }
}

impl fmt::Display for Automaton {
    /// Table layout: the name line, an alphabet header with each symbol
    /// padded by the width of the first state's name, then one row per
    /// state marked `*` when accepting, every token followed by a space.
    /// The output is itself a parseable definition block.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;

        let pad = self
            .states
            .first()
            .map_or(0, |s| s.name.chars().count());
        write!(f, "  ")?;
        for symbol in &self.alphabet {
            for _ in 0..pad {
                write!(f, " ")?;
            }
            write!(f, "{symbol}")?;
        }
        writeln!(f)?;

        for state in &self.states {
            let marker = if self.is_accepting(&state.name) { '*' } else { ' ' };
            write!(f, "{marker}{} ", state.name)?;
            for target in &state.transitions {
                write!(f, "{target} ")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle_machine() -> Automaton {
        // q0 <-> q1 on '0', self-loop on '1' at q1; accepts in q0
        Automaton::new(
            "ex".to_string(),
            vec!["0".to_string(), "1".to_string()],
            vec![
                State::new("q0", vec!["q1".to_string(), "q0".to_string()]),
                State::new("q1", vec!["q1".to_string(), "q1".to_string()]),
            ],
            ["q0".to_string()].into_iter().collect(),
        )
    }

    #[test]
    fn test_reject_after_leaving_accept_state() {
        let machine = toggle_machine();
        // q0 -0-> q1 -1-> q1 -0-> q1
        assert_eq!(machine.evaluate("010"), Ok(Verdict::Reject));
    }

    #[test]
    fn test_empty_input_accepts_in_accepting_start_state() {
        let machine = toggle_machine();
        assert_eq!(machine.evaluate(""), Ok(Verdict::Accept));
    }

    #[test]
    fn test_start_state_is_first_table_entry() {
        // accept state listed second; empty input must still reject
        let machine = Automaton::new(
            "m".to_string(),
            vec!["a".to_string()],
            vec![
                State::new("s0", vec!["s1".to_string()]),
                State::new("s1", vec!["s1".to_string()]),
            ],
            ["s1".to_string()].into_iter().collect(),
        );
        assert_eq!(machine.evaluate(""), Ok(Verdict::Reject));
        assert_eq!(machine.evaluate("a"), Ok(Verdict::Accept));
    }

    #[test]
    fn test_unknown_symbol_aborts_without_verdict() {
        let machine = toggle_machine();
        assert_eq!(
            machine.evaluate("012"),
            Err(AlphabetError {
                symbol: '2',
                position: 2
            })
        );
    }

    #[test]
    fn test_evaluate_is_pure() {
        let machine = toggle_machine();
        assert_eq!(machine.evaluate("0110"), machine.evaluate("0110"));
        assert_eq!(machine.evaluate("2"), machine.evaluate("2"));
    }

    #[test]
    fn test_dangling_target_keeps_current_state() {
        // transition on 'a' points at a state that does not exist; the
        // machine stays put and the verdict depends only on the start state
        let machine = Automaton::new(
            "m".to_string(),
            vec!["a".to_string()],
            vec![State::new("s0", vec!["ghost".to_string()])],
            ["s0".to_string()].into_iter().collect(),
        );
        assert_eq!(machine.evaluate("aaa"), Ok(Verdict::Accept));
    }

    #[test]
    fn test_multichar_alphabet_token_never_matches() {
        let machine = Automaton::new(
            "m".to_string(),
            vec!["ab".to_string()],
            vec![State::new("s0", vec!["s0".to_string()])],
            ["s0".to_string()].into_iter().collect(),
        );
        assert_eq!(
            machine.evaluate("a"),
            Err(AlphabetError {
                symbol: 'a',
                position: 0
            })
        );
    }

    #[test]
    fn test_display_table_layout() {
        let machine = toggle_machine();
        let expected = "ex\n    0  1\n*q0 q1 q0 \n q1 q1 q1 \n";
        assert_eq!(machine.to_string(), expected);
    }
}
