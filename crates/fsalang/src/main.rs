use anyhow::Result;
use clap::{ArgAction, Parser};
use fsalang::automaton::Strictness;
use fsalang::session::Session;
use std::io;

#[derive(Parser, Debug)]
#[command(name = "fsalang")]
#[command(about = "Interactive interpreter for a small DFA-definition language", long_about = None)]
struct Args {
    /// Accept historical definitions: skip the duplicate-state,
    /// accept-state and transition-target checks
    #[arg(long, action = ArgAction::SetTrue)]
    lenient: bool,

    /// Silence log output, overriding RUST_LOG
    #[arg(short = 'q', long, action = ArgAction::SetTrue)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.quiet {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Off)
            .init();
    } else {
        env_logger::init();
    }

    let strictness = if args.lenient {
        Strictness::Lenient
    } else {
        Strictness::Strict
    };

    let mut session = Session::new(strictness, io::stdout().lock(), io::stderr().lock());
    session.run(io::stdin().lock())?;
    Ok(())
}
