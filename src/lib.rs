pub mod args;
pub mod cmd;
pub mod debugger;
pub mod error;
pub mod ptracer;
pub mod repl;

pub use cmd::{eval, CommandKind, CommandSpec, Flow, COMMANDS};
pub use debugger::{Debugger, Status};
pub use error::Error;
pub use ptracer::{Pid, ProcessPort, Ptracer, Signal, WaitStatus};
