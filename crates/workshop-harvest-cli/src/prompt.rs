//! Interactive URL prompt.
//!
//! Reads item references one per line until the `DONE` sentinel or end of
//! input. Empty lines, duplicates and URLs outside the workshop host are
//! rejected and the prompt repeats.

use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use workshop_harvest::ReferenceList;

/// Typed on its own line to finish entering URLs.
pub const SENTINEL: &str = "DONE";

/// How URL entry ended.
#[derive(Debug)]
pub enum PromptOutcome {
    /// Sentinel or end of input.
    Finished(ReferenceList),
    /// Ctrl+C while typing, with whatever was accepted before it.
    Interrupted(ReferenceList),
}

/// What to do with one line of operator input.
#[derive(Debug, PartialEq, Eq)]
pub enum LineAction {
    Finish,
    Accepted(String),
    Rejected(String),
}

/// Classify one line against the sentinel and the references so far.
pub fn handle_line(line: &str, references: &mut ReferenceList) -> LineAction {
    if line.trim() == SENTINEL {
        return LineAction::Finish;
    }
    match references.push(line) {
        Ok(url) => LineAction::Accepted(url.to_string()),
        Err(e) => LineAction::Rejected(e.to_string()),
    }
}

/// Prompt until the operator is done.
pub fn collect(host_prefix: &str) -> anyhow::Result<PromptOutcome> {
    eprintln!();
    eprintln!(
        "  \x1b[1mworkshop-harvest v{}\x1b[0m \x1b[90m\u{2014} Steam Workshop ID collector\x1b[0m",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!();
    eprintln!("    Enter item or modpack URLs one per line. Type \x1b[1m{SENTINEL}\x1b[0m when finished.");
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl = DefaultEditor::with_config(config)?;

    let mut references = ReferenceList::new(host_prefix);
    let prompt = " \x1b[36murl>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => match handle_line(&line, &mut references) {
                LineAction::Finish => break,
                LineAction::Accepted(_) => {}
                LineAction::Rejected(reason) => {
                    eprintln!("  \x1b[33m!\x1b[0m {reason}. Please try again.");
                }
            },
            Err(ReadlineError::Interrupted) => {
                return Ok(PromptOutcome::Interrupted(references));
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(PromptOutcome::Finished(references))
}
