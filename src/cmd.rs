//! The command table and dispatcher: a raw input line becomes a repeat
//! count, a command, and a quoted argument list.

use std::collections::HashSet;

use crate::args;
use crate::debugger::Debugger;
use crate::error::{Error, Result};
use crate::ptracer::ProcessPort;

/// What the interactive loop should do after evaluating a line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The operation behind a command character.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommandKind {
    Exec,
    Attach,
    Detach,
    Continue,
    Info,
    Quit,
    Help,
}

/// A command table entry: one-character name, operation, and help text.
pub struct CommandSpec {
    pub name: char,
    pub help: &'static str,
    pub kind: CommandKind,
}

pub static COMMANDS: [CommandSpec; 7] = [
    CommandSpec {
        name: 'e',
        help: "(exec) forks the current process and breaks before execution",
        kind: CommandKind::Exec,
    },
    CommandSpec {
        name: 'a',
        help: "(attach) attach to a running process",
        kind: CommandKind::Attach,
    },
    CommandSpec {
        name: 'd',
        help: "(detach) detaches from the current inferior process",
        kind: CommandKind::Detach,
    },
    CommandSpec {
        name: 'c',
        help: "(continue) continues execution on the inferior process",
        kind: CommandKind::Continue,
    },
    CommandSpec {
        name: 'i',
        help: "(info) displays process info",
        kind: CommandKind::Info,
    },
    CommandSpec {
        name: 'q',
        help: "(quit) terminates the debugging session",
        kind: CommandKind::Quit,
    },
    CommandSpec {
        name: 'h',
        help: "(help) displays a list of the available commands",
        kind: CommandKind::Help,
    },
];

fn lookup(name: char) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|cmd| cmd.name == name)
}

/// Evaluate one input line: an optional decimal repeat count, a command
/// character, and an optional whitespace-separated argument list.
///
/// The matched command is invoked once per repetition, each time with the
/// same argument list, stopping early on the first failure. A blank line,
/// or a bare repeat count, is a no-op.
pub fn eval<P: ProcessPort>(dbg: &mut Debugger<P>, line: &str) -> Result<Flow> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(Flow::Continue);
    }

    let (count, rest) = parse_cardinality(line)?;

    let mut chars = rest.chars();
    let name = match chars.next() {
        Some(name) => name,
        None => return Ok(Flow::Continue),
    };

    if !name.is_alphabetic() {
        return Err(Error::InvalidCommandName);
    }

    let cmd = lookup(name).ok_or(Error::UnrecognizedCommand)?;

    // Arguments are only tokenized when the command character is followed
    // by whitespace; anything glued directly onto it is ignored.
    let tail = chars.as_str();
    let args = match tail.chars().next() {
        Some(c) if c.is_ascii_whitespace() => args::unquote(tail)?,
        _ => Vec::new(),
    };

    for _ in 0..count {
        if let Flow::Quit = invoke(dbg, cmd.kind, &args)? {
            return Ok(Flow::Quit);
        }
    }

    Ok(Flow::Continue)
}

fn invoke<P: ProcessPort>(dbg: &mut Debugger<P>, kind: CommandKind, args: &[String]) -> Result<Flow> {
    match kind {
        CommandKind::Exec => dbg.exec(args)?,
        CommandKind::Attach => dbg.attach(args)?,
        CommandKind::Detach => dbg.detach()?,
        CommandKind::Continue => dbg.cont()?,
        CommandKind::Info => dbg.info()?,
        CommandKind::Help => help(args),
        CommandKind::Quit => {
            dbg.quit()?;
            return Ok(Flow::Quit);
        },
    }

    Ok(Flow::Continue)
}

// A leading decimal integer is the repeat count; default 1. Zero and
// unrepresentable values are rejected.
fn parse_cardinality(line: &str) -> Result<(usize, &str)> {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    let digits = line.len() - rest.len();

    if digits == 0 {
        return Ok((1, line));
    }

    let count = line[..digits]
        .parse::<usize>()
        .map_err(|_| Error::InvalidCardinality)?;

    if count == 0 {
        return Err(Error::InvalidCardinality);
    }

    Ok((count, rest))
}

/// With no arguments, list every command. Otherwise, show each named
/// command's description, exactly once however many times it is named.
fn help(args: &[String]) {
    if args.is_empty() {
        for cmd in &COMMANDS {
            println!("{}: {}", cmd.name, cmd.help);
        }

        return;
    }

    // Tracks what was already shown during this invocation only; arguments
    // that do not name a command are ignored.
    let mut shown = HashSet::new();

    for cmd in &COMMANDS {
        for arg in args {
            let mut chars = arg.chars();

            if let (Some(name), None) = (chars.next(), chars.next()) {
                if name == cmd.name && shown.insert(name) {
                    println!("{}  {}", cmd.name, cmd.help);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinality_defaults_to_one() {
        let (count, rest) = parse_cardinality("c").unwrap();
        assert_eq!(count, 1);
        assert_eq!(rest, "c");
    }

    #[test]
    fn cardinality_is_split_off() {
        let (count, rest) = parse_cardinality("12h q").unwrap();
        assert_eq!(count, 12);
        assert_eq!(rest, "h q");
    }

    #[test]
    fn cardinality_zero_is_rejected() {
        assert!(matches!(
            parse_cardinality("0c"),
            Err(Error::InvalidCardinality)
        ));
    }

    #[test]
    fn cardinality_overflow_is_rejected() {
        assert!(matches!(
            parse_cardinality("99999999999999999999999999c"),
            Err(Error::InvalidCardinality)
        ));
    }
}
