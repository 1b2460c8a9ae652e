//! The interactive loop: poll the controller, read one line, evaluate it.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cmd::{self, Flow};
use crate::debugger::Debugger;
use crate::error::Result;
use crate::ptracer::ProcessPort;

const PROMPT: &str = "\x1b[35m(ddb)\x1b[0m ";
const PROMPT_AFTER_ERROR: &str = "\x1b[31m(ddb)\x1b[0m ";

pub const ERROR_PREFIX: &str = "\x1b[0;31merror:\x1b[0m";

/// Run the session to completion: end of input, interrupt, or the quit
/// command.
pub fn run<P: ProcessPort>(dbg: &mut Debugger<P>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut failed = false;

    loop {
        // Observe inferior exit before blocking on input, so the operator is
        // never shown a stale prompt for a dead inferior.
        dbg.poll();

        let prompt = if failed { PROMPT_AFTER_ERROR } else { PROMPT };

        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(err) => return Err(err.into()),
        };

        let _ = rl.add_history_entry(line.as_str());

        match cmd::eval(dbg, &line) {
            Ok(Flow::Continue) => failed = false,
            Ok(Flow::Quit) => break,
            Err(err) => {
                println!("{} {}", ERROR_PREFIX, err);
                failed = true;
            },
        }
    }

    Ok(())
}
