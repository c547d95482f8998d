//! fsalang: an interactive interpreter for a small language that defines
//! deterministic finite automata and tests strings against them.
//!
//! The crate is split into:
//! - [`automaton`]: definition-block parsing, validation, and the
//!   deterministic acceptance-check engine
//! - [`environment`]: the session's ordered name-to-literal store
//! - [`session`]: the instruction loop wiring the two together

pub mod automaton;
pub mod environment;
pub mod session;
