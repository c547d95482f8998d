//! Line-fed parser for automaton definition blocks.
//!
//! A definition block is a name line, an alphabet line, and one state
//! row per state, terminated by a blank line:
//!
//! ```text
//! even
//! 0 1
//! *e o e
//! o e o
//! ```
//!
//! The parser only recognizes the block's shape; counting transitions
//! against the alphabet is the validator's job.

use thiserror::Error;

/// A definition block that violates the grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GrammarError {
    /// Blank line where the name line was expected.
    #[error("definition block is missing its name line")]
    MissingName,
    /// Blank line where the alphabet line was expected.
    #[error("definition block is missing its alphabet line")]
    MissingAlphabet,
    /// Input ended before the terminating blank line.
    #[error("definition block was not terminated by a blank line")]
    Unterminated,
    /// A line was fed past the terminating blank line.
    #[error("definition block is already complete")]
    TrailingLine,
}

/// One state row as written: name plus transition targets, arity
/// unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub name: String,
    pub targets: Vec<String>,
}

/// Unvalidated output of the block parser.
///
/// `accept_names` records, in row order, every state name that was
/// written with a leading `*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAutomaton {
    pub name: String,
    pub alphabet: Vec<String>,
    pub rows: Vec<RawRow>,
    pub accept_names: Vec<String>,
}

/// What the parser expects from the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Name,
    Alphabet,
    RowOrEnd,
    Done,
}

/// Whether the block still wants more lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NeedMore,
    Complete,
}

/// Incremental parser for one definition block. Feed it lines until it
/// reports [`Progress::Complete`], then take the candidate with
/// [`finish`](BlockParser::finish).
#[derive(Debug)]
pub struct BlockParser {
    expect: Expect,
    candidate: RawAutomaton,
}

impl BlockParser {
    /// Start parsing a fresh block.
    pub fn new() -> Self {
        Self {
            expect: Expect::Name,
            candidate: RawAutomaton::default(),
        }
    }

    /// Consume one line of the block.
    ///
    /// The terminating blank line is consumed here and nothing past it
    /// ever is; feeding further lines is an error.
    pub fn feed(&mut self, line: &str) -> Result<Progress, GrammarError> {
        let mut tokens = line.split_whitespace();

        match self.expect {
            Expect::Name => {
                // first token is the name, the rest of the line is discarded
                let name = tokens.next().ok_or(GrammarError::MissingName)?;
                self.candidate.name = name.to_string();
                self.expect = Expect::Alphabet;
                Ok(Progress::NeedMore)
            }
            Expect::Alphabet => {
                // every token is one symbol, shape unchecked
                self.candidate.alphabet = tokens.map(str::to_string).collect();
                if self.candidate.alphabet.is_empty() {
                    return Err(GrammarError::MissingAlphabet);
                }
                self.expect = Expect::RowOrEnd;
                Ok(Progress::NeedMore)
            }
            Expect::RowOrEnd => {
                let Some(first) = tokens.next() else {
                    self.expect = Expect::Done;
                    return Ok(Progress::Complete);
                };
                let name = match first.strip_prefix('*') {
                    Some(stripped) => {
                        self.candidate.accept_names.push(stripped.to_string());
                        stripped
                    }
                    None => first,
                };
                self.candidate.rows.push(RawRow {
                    name: name.to_string(),
                    targets: tokens.map(str::to_string).collect(),
                });
                Ok(Progress::NeedMore)
            }
            Expect::Done => Err(GrammarError::TrailingLine),
        }
    }

    /// Whether the terminating blank line has been seen.
    pub fn is_complete(&self) -> bool {
        self.expect == Expect::Done
    }

    /// Take the raw candidate out of a completed parser.
    pub fn finish(self) -> Result<RawAutomaton, GrammarError> {
        if self.expect == Expect::Done {
            Ok(self.candidate)
        } else {
            Err(GrammarError::Unterminated)
        }
    }
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}
