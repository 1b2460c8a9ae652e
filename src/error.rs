use std::io;

use crate::ptracer::Pid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    // Command line parsing.
    #[error("command cardinality is out of range")]
    InvalidCardinality,

    #[error("invalid command name")]
    InvalidCommandName,

    #[error("unrecognized debugger command")]
    UnrecognizedCommand,

    #[error("expected closing quote at column {column}")]
    UnterminatedQuote { column: usize },

    // Controller state.
    #[error("no process attached")]
    NoInferior,

    #[error("expected a command line")]
    EmptyCommandLine,

    #[error("expected process ID as argument")]
    InvalidArgumentCount,

    #[error("invalid process ID")]
    InvalidPid,

    // OS requests.
    #[error("could not spawn inferior process")]
    Spawn { source: nix::Error },

    #[error("could not attach to process {pid}")]
    Attach { pid: Pid, source: nix::Error },

    #[error("could not continue process {pid}")]
    Resume { pid: Pid, source: nix::Error },

    #[error("input/output error")]
    IO(#[from] io::Error),

    #[error("OS error")]
    OS(#[from] nix::Error),

    #[error("line editing error")]
    Readline(#[from] rustyline::error::ReadlineError),
}
