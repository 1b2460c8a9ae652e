//! The process-control port: the narrow set of OS requests issued against an
//! inferior, and its real ptrace(2) implementation.

use std::ffi::CString;
use std::ptr;

use nix::errno::Errno;
use nix::sys::{
    ptrace, signal,
    wait::{self, WaitPidFlag},
};
use nix::unistd::{self, ForkResult};
use tracing::debug;

pub use nix::sys::signal::Signal;
pub use nix::sys::wait::WaitStatus;
pub use nix::unistd::Pid;

/// Process-control requests the controller issues against an inferior.
///
/// Every method is a single, synchronous OS request. The controller only
/// talks to the inferior through this trait, so its state machine can be
/// driven by a fake implementation in tests.
pub trait ProcessPort {
    /// Create a new process executing `argv`, returning its pid. The new
    /// process is not yet traced.
    fn spawn(&mut self, argv: &[String]) -> nix::Result<Pid>;

    /// Begin tracing `pid`, leaving it stopped.
    fn attach(&mut self, pid: Pid) -> nix::Result<()>;

    /// Stop tracing `pid`, letting it run freely.
    fn detach(&mut self, pid: Pid) -> nix::Result<()>;

    /// Resume the stopped `pid`, delivering `signal` if given.
    fn resume(&mut self, pid: Pid, signal: Option<Signal>) -> nix::Result<()>;

    /// Poll `pid` for a status change, without blocking.
    fn wait_nonblocking(&mut self, pid: Pid) -> nix::Result<WaitStatus>;

    /// Request that `pid` terminate.
    fn terminate(&mut self, pid: Pid) -> nix::Result<()>;
}

/// The real [`ProcessPort`], backed by fork(2), ptrace(2), and wait(2).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Ptracer;

impl Ptracer {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessPort for Ptracer {
    fn spawn(&mut self, argv: &[String]) -> nix::Result<Pid> {
        if argv.is_empty() {
            return Err(Errno::EINVAL);
        }

        // Ensure we own NUL-terminated strings for the foreign exec call.
        //
        // We're heap-allocating, so always do this before forking.
        let argv: Result<Vec<CString>, _> = argv
            .iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect();
        let argv = argv.map_err(|_| Errno::EINVAL)?;

        let mut argp: Vec<*const libc::c_char> = argv.iter().map(|s| s.as_ptr()).collect();
        argp.push(ptr::null());

        match unsafe { unistd::fork()? } {
            ForkResult::Child => {
                // Only async-signal-safe calls are permitted post-fork, so
                // use raw `libc::execvp` over the pre-built argument vector.
                // The `nix` wrapper heap-allocates internally.
                unsafe {
                    libc::execvp(argp[0], argp.as_ptr());

                    // Image replacement failed. Exit without any side effect
                    // on the parent's state.
                    libc::_exit(0);
                }
            },
            ForkResult::Parent { child } => Ok(child),
        }
    }

    fn attach(&mut self, pid: Pid) -> nix::Result<()> {
        ptrace::attach(pid)?;

        // Consume the attach-stop, so the inferior really is stopped when
        // this returns and an immediate resume cannot race the `SIGSTOP`.
        let status = wait::waitpid(pid, None)?;
        debug!(?status, "consumed attach-stop");

        Ok(())
    }

    fn detach(&mut self, pid: Pid) -> nix::Result<()> {
        ptrace::detach(pid, None::<Signal>)
    }

    fn resume(&mut self, pid: Pid, signal: Option<Signal>) -> nix::Result<()> {
        ptrace::cont(pid, signal)
    }

    fn wait_nonblocking(&mut self, pid: Pid) -> nix::Result<WaitStatus> {
        wait::waitpid(pid, Some(WaitPidFlag::WNOHANG))
    }

    fn terminate(&mut self, pid: Pid) -> nix::Result<()> {
        signal::kill(pid, Signal::SIGTERM)
    }
}
