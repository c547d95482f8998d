//! Instruction loop: tokenizes command lines and drives the core.
//!
//! A [`Session`] owns the environment and the two output sinks for one
//! interactive run. Verdicts and printed values go to the output sink;
//! every diagnostic goes to the error sink and leaves the session alive.
//! Only `quit` or end of input ends a session.

use crate::automaton::{BlockParser, Progress, Strictness, Verdict, validate};
use crate::environment::{Environment, Literal};
use log::debug;
use std::borrow::Cow;
use std::io::{self, BufRead, Write};

/// Whether the session should keep reading lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// A definition block under construction: the literal name it will be
/// stored under, plus the parser eating its lines.
#[derive(Debug)]
struct Definition {
    name: String,
    parser: BlockParser,
}

/// One interactive session: environment, validation strictness, and the
/// output/error sinks. Generic over the sinks so tests can drive it over
/// in-memory buffers.
pub struct Session<W, E> {
    env: Environment,
    strictness: Strictness,
    out: W,
    err: E,
    building: Option<Definition>,
}

impl<W: Write, E: Write> Session<W, E> {
    /// Create a session with an empty environment.
    pub fn new(strictness: Strictness, out: W, err: E) -> Self {
        Self {
            env: Environment::new(),
            strictness,
            out,
            err,
            building: None,
        }
    }

    /// The session's literal store.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Consume instruction lines until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            if self.handle_line(&line?)? == Control::Quit {
                return Ok(());
            }
        }
        self.finish()
    }

    /// Process a single line.
    pub fn handle_line(&mut self, line: &str) -> io::Result<Control> {
        // a block under construction consumes lines before any
        // instruction tokenizing happens
        if let Some(mut def) = self.building.take() {
            match def.parser.feed(line) {
                Ok(Progress::NeedMore) => self.building = Some(def),
                Ok(Progress::Complete) => self.install(def)?,
                Err(e) => writeln!(self.err, "cannot define {}: {e}", def.name)?,
            }
            return Ok(Control::Continue);
        }

        let (line, had_string) = if line.contains('"') {
            let Some(cleaned) = normalize_quoted(line) else {
                writeln!(self.err, "instruction contains invalid number of strings")?;
                return Ok(Control::Continue);
            };
            (Cow::Owned(cleaned), true)
        } else {
            (Cow::Borrowed(line), false)
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&verb) = tokens.first() else {
            return Ok(Control::Continue);
        };

        match verb {
            "quit" => return Ok(Control::Quit),
            "define" => self.exec_define(&tokens, had_string)?,
            "run" => self.exec_run(&tokens, had_string)?,
            "print" => self.exec_print(&tokens)?,
            _ => writeln!(self.err, "invalid instruction {verb:?}")?,
        }
        Ok(Control::Continue)
    }

    /// Signal end of input. A definition block still open at this point
    /// yields its grammar diagnostic; the session then ends cleanly.
    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(def) = self.building.take() {
            if let Err(e) = def.parser.finish() {
                writeln!(self.err, "cannot define {}: {e}", def.name)?;
            }
        }
        Ok(())
    }

    /// Validate a completed block and store the machine.
    fn install(&mut self, def: Definition) -> io::Result<()> {
        let Definition { name, parser } = def;
        let raw = match parser.finish() {
            Ok(raw) => raw,
            Err(e) => {
                writeln!(self.err, "cannot define {name}: {e}")?;
                return Ok(());
            }
        };
        match validate(raw, self.strictness) {
            Ok(machine) => {
                debug!("defined automaton {name}");
                self.env.define(name, Literal::Machine(machine));
            }
            Err(e) => writeln!(self.err, "cannot define {name}: {e}")?,
        }
        Ok(())
    }

    fn exec_define(&mut self, tokens: &[&str], had_string: bool) -> io::Result<()> {
        let (Some(&name), Some(&value)) = (tokens.get(1), tokens.get(2)) else {
            writeln!(self.err, "define requires a name and a value")?;
            return Ok(());
        };

        if !had_string && value == "fsa" {
            debug!("collecting definition block for {name}");
            self.building = Some(Definition {
                name: name.to_string(),
                parser: BlockParser::new(),
            });
        } else if had_string {
            self.env.define(name, Literal::Str(value.to_string()));
        } else {
            // alias: copy the value as it is now, never a live reference
            match self.env.get(value).cloned() {
                Some(copied) => self.env.define(name, copied),
                None => writeln!(self.err, "provided literal {value:?} is undefined")?,
            }
        }
        Ok(())
    }

    fn exec_run(&mut self, tokens: &[&str], had_string: bool) -> io::Result<()> {
        let (Some(&name), Some(&operand)) = (tokens.get(1), tokens.get(2)) else {
            writeln!(self.err, "run requires an automaton and an input")?;
            return Ok(());
        };

        let machine = match self.env.get(name) {
            Some(Literal::Machine(machine)) => machine.clone(),
            Some(Literal::Str(_)) => {
                writeln!(self.err, "{name:?} is not an automaton")?;
                return Ok(());
            }
            None => {
                writeln!(self.err, "provided automaton {name:?} is undefined")?;
                return Ok(());
            }
        };

        let input = if had_string {
            operand.to_string()
        } else {
            match self.env.get(operand) {
                Some(Literal::Str(s)) => s.clone(),
                Some(Literal::Machine(_)) => {
                    writeln!(self.err, "{operand:?} is not a string")?;
                    return Ok(());
                }
                None => {
                    writeln!(self.err, "provided literal {operand:?} is undefined")?;
                    return Ok(());
                }
            }
        };

        debug!("running {name} on {input:?}");
        match machine.evaluate(&input) {
            Ok(Verdict::Accept) => writeln!(self.out, "accept")?,
            Ok(Verdict::Reject) => writeln!(self.out, "reject")?,
            // no verdict: nothing on the output sink
            Err(e) => writeln!(self.err, "cannot run {name}: {e}")?,
        }
        Ok(())
    }

    fn exec_print(&mut self, tokens: &[&str]) -> io::Result<()> {
        let Some(&name) = tokens.get(1) else {
            writeln!(self.err, "print requires a literal name")?;
            return Ok(());
        };
        // an undefined name is silently ignored
        if let Some(value) = self.env.get(name) {
            writeln!(self.out, "{value}")?;
        }
        Ok(())
    }
}

/// Normalize a line carrying one quoted span: strip the quotes and every
/// whitespace character inside the span. Returns `None` unless the line
/// has exactly one opening and one closing quote.
fn normalize_quoted(line: &str) -> Option<String> {
    let parts: Vec<&str> = line.split('"').collect();
    if parts.len() != 3 {
        return None;
    }
    let mut cleaned = String::with_capacity(line.len());
    cleaned.push_str(parts[0]);
    for token in parts[1].split_whitespace() {
        cleaned.push_str(token);
    }
    cleaned.push_str(parts[2]);
    Some(cleaned)
}
