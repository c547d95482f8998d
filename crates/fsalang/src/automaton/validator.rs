//! Invariant checks that turn a raw definition into a machine.

use crate::automaton::machine::{Automaton, State};
use crate::automaton::parser::RawAutomaton;
use indexmap::IndexSet;
use thiserror::Error;

/// How thoroughly a candidate is checked.
///
/// [`Strict`](Strictness::Strict) additionally rejects duplicate state
/// names, accept states that name no row, and transitions whose target
/// names no row. [`Lenient`](Strictness::Lenient) runs the historical
/// checks only; machines it admits may take the engine's stay-put step
/// on a dangling target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    #[default]
    Strict,
    Lenient,
}

/// A candidate that violates the machine invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("alphabet cannot be empty")]
    EmptyAlphabet,
    #[error("automaton cannot be defined with 0 states")]
    EmptyStateTable,
    #[error("automaton cannot be defined with 0 accept states")]
    EmptyAcceptStates,
    #[error("more accept states ({accepting}) than defined states ({defined})")]
    TooManyAcceptStates { accepting: usize, defined: usize },
    /// A state row whose transition count does not match the alphabet.
    /// Missing and surplus transitions are the same error kind; only the
    /// message differs.
    #[error(
        "state {state:?} in state table {}",
        if actual < expected {
            "is missing one or more transitions"
        } else {
            "has one or more too many transitions"
        }
    )]
    ArityMismatch {
        state: String,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate state name {state:?} in state table")]
    DuplicateStateName { state: String },
    #[error("accept state {state:?} does not name a state in the table")]
    UnknownAcceptState { state: String },
    #[error("state {state:?} transition on {symbol:?} targets undefined state {target:?}")]
    DanglingTransition {
        state: String,
        symbol: String,
        target: String,
    },
}

/// Check `raw` against the machine invariants and build the automaton.
///
/// Checks run in a fixed order and stop at the first failure, so a given
/// candidate always produces the same diagnostic: empty alphabet, empty
/// state table, empty accept states, accept-state count, then per-row
/// arity in table order. Strict mode then adds duplicate state names,
/// unknown accept states, and dangling transition targets, each reported
/// for the first offender in definition order.
pub fn validate(raw: RawAutomaton, strictness: Strictness) -> Result<Automaton, ValidationError> {
    let RawAutomaton {
        name,
        alphabet,
        rows,
        accept_names,
    } = raw;

    if alphabet.is_empty() {
        return Err(ValidationError::EmptyAlphabet);
    }
    if rows.is_empty() {
        return Err(ValidationError::EmptyStateTable);
    }
    if accept_names.is_empty() {
        return Err(ValidationError::EmptyAcceptStates);
    }
    if accept_names.len() > rows.len() {
        return Err(ValidationError::TooManyAcceptStates {
            accepting: accept_names.len(),
            defined: rows.len(),
        });
    }
    for row in &rows {
        if row.targets.len() != alphabet.len() {
            return Err(ValidationError::ArityMismatch {
                state: row.name.clone(),
                expected: alphabet.len(),
                actual: row.targets.len(),
            });
        }
    }

    if strictness == Strictness::Strict {
        let mut names: IndexSet<&str> = IndexSet::with_capacity(rows.len());
        for row in &rows {
            if !names.insert(row.name.as_str()) {
                return Err(ValidationError::DuplicateStateName {
                    state: row.name.clone(),
                });
            }
        }
        for accept in &accept_names {
            if !names.contains(accept.as_str()) {
                return Err(ValidationError::UnknownAcceptState {
                    state: accept.clone(),
                });
            }
        }
        for row in &rows {
            for (target, symbol) in row.targets.iter().zip(&alphabet) {
                if !names.contains(target.as_str()) {
                    return Err(ValidationError::DanglingTransition {
                        state: row.name.clone(),
                        symbol: symbol.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }

    let states = rows
        .into_iter()
        .map(|row| State::new(row.name, row.targets))
        .collect();
    let accept_states: IndexSet<String> = accept_names.into_iter().collect();

    Ok(Automaton::new(name, alphabet, states, accept_states))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::parser::RawRow;

    fn row(name: &str, targets: &[&str]) -> RawRow {
        RawRow {
            name: name.to_string(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn toggle_candidate() -> RawAutomaton {
        RawAutomaton {
            name: "ex".to_string(),
            alphabet: vec!["0".to_string(), "1".to_string()],
            rows: vec![row("q0", &["q1", "q0"]), row("q1", &["q1", "q1"])],
            accept_names: vec!["q0".to_string()],
        }
    }

    #[test]
    fn test_valid_candidate_builds_machine() {
        let machine = validate(toggle_candidate(), Strictness::Strict).unwrap();
        assert_eq!(machine.name(), "ex");
        assert_eq!(machine.alphabet(), ["0", "1"]);
        assert_eq!(machine.states().len(), 2);
        assert!(machine.is_accepting("q0"));
        assert!(!machine.is_accepting("q1"));
    }

    #[test]
    fn test_empty_alphabet_reported_before_empty_state_table() {
        let raw = RawAutomaton::default();
        assert_eq!(
            validate(raw, Strictness::Strict),
            Err(ValidationError::EmptyAlphabet)
        );
    }

    #[test]
    fn test_empty_state_table() {
        let raw = RawAutomaton {
            alphabet: vec!["a".to_string()],
            ..RawAutomaton::default()
        };
        assert_eq!(
            validate(raw, Strictness::Strict),
            Err(ValidationError::EmptyStateTable)
        );
    }

    #[test]
    fn test_empty_accept_states() {
        let mut raw = toggle_candidate();
        raw.accept_names.clear();
        assert_eq!(
            validate(raw, Strictness::Strict),
            Err(ValidationError::EmptyAcceptStates)
        );
    }

    #[test]
    fn test_more_accept_states_than_states() {
        let mut raw = toggle_candidate();
        raw.accept_names = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(
            validate(raw, Strictness::Lenient),
            Err(ValidationError::TooManyAcceptStates {
                accepting: 3,
                defined: 2
            })
        );
    }

    #[test]
    fn test_arity_mismatch_reports_first_offending_row() {
        let mut raw = toggle_candidate();
        raw.rows[0].targets.pop();
        raw.rows[1].targets.push("q1".to_string());
        let err = validate(raw, Strictness::Strict).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ArityMismatch {
                state: "q0".to_string(),
                expected: 2,
                actual: 1,
            }
        );
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_arity_mismatch_message_distinguishes_extra() {
        let mut raw = toggle_candidate();
        raw.rows[0].targets.push("q0".to_string());
        let err = validate(raw, Strictness::Strict).unwrap_err();
        assert!(err.to_string().contains("too many"));
    }

    #[test]
    fn test_strict_rejects_duplicate_state_name() {
        let mut raw = toggle_candidate();
        raw.rows.push(row("q0", &["q0", "q0"]));
        raw.accept_names.push("q1".to_string());
        assert_eq!(
            validate(raw, Strictness::Strict),
            Err(ValidationError::DuplicateStateName {
                state: "q0".to_string()
            })
        );
    }

    #[test]
    fn test_strict_rejects_unknown_accept_state() {
        let mut raw = toggle_candidate();
        raw.accept_names = vec!["nowhere".to_string()];
        assert_eq!(
            validate(raw, Strictness::Strict),
            Err(ValidationError::UnknownAcceptState {
                state: "nowhere".to_string()
            })
        );
    }

    #[test]
    fn test_strict_rejects_dangling_transition() {
        let mut raw = toggle_candidate();
        raw.rows[1].targets[1] = "ghost".to_string();
        assert_eq!(
            validate(raw, Strictness::Strict),
            Err(ValidationError::DanglingTransition {
                state: "q1".to_string(),
                symbol: "1".to_string(),
                target: "ghost".to_string(),
            })
        );
    }

    #[test]
    fn test_lenient_admits_dangling_transition() {
        let mut raw = toggle_candidate();
        raw.rows[1].targets[1] = "ghost".to_string();
        assert!(validate(raw, Strictness::Lenient).is_ok());
    }

    #[test]
    fn test_lenient_admits_duplicate_and_unknown_accept() {
        let mut raw = toggle_candidate();
        raw.rows.push(row("q0", &["q0", "q0"]));
        raw.accept_names = vec!["nowhere".to_string(), "q1".to_string()];
        assert!(validate(raw, Strictness::Lenient).is_ok());
    }

    #[test]
    fn test_strict_checks_run_after_arity() {
        // both a dangling target and an arity error: arity wins
        let mut raw = toggle_candidate();
        raw.rows[0].targets = vec!["ghost".to_string()];
        assert!(matches!(
            validate(raw, Strictness::Strict),
            Err(ValidationError::ArityMismatch { .. })
        ));
    }
}
