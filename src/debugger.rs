//! The process controller: one attached inferior, and the state machine
//! governing what may be done to it.

use std::io::{self, BufRead, Write};

use nix::errno::Errno;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ptracer::{Pid, ProcessPort, Signal, WaitStatus};

/// Execution state of an attached inferior.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Paused,
    Running,
}

/// Debugger context for a single inferior process.
///
/// All process-control requests go through the [`ProcessPort`] `P`, so the
/// state machine can be exercised in tests with a fake port. There is never
/// more than one tracked inferior: every operation that attaches first drops
/// any existing attachment.
pub struct Debugger<P> {
    port: P,

    /// Pid of the attached inferior, if any.
    pid: Option<Pid>,

    /// Meaningful only while `pid` is present.
    status: Status,

    /// Argument vector the inferior was launched with. Empty when attached
    /// to a pre-existing process: argv is not recovered for external pids.
    launch_args: Vec<String>,

    /// Path of the inferior's executable image. Shown by `info`, but never
    /// populated by attach.
    image_path: Option<String>,

    /// Asks the operator whether a still-attached inferior should be
    /// terminated. Defaults to a y/n prompt on the console.
    confirm: Box<dyn FnMut(Pid) -> bool>,
}

impl<P: ProcessPort> Debugger<P> {
    pub fn new(port: P) -> Self {
        Self::with_confirm(port, Box::new(confirm_terminate))
    }

    /// Build a controller with a custom terminate-confirmation, e.g. a fixed
    /// answer in tests.
    pub fn with_confirm(port: P, confirm: Box<dyn FnMut(Pid) -> bool>) -> Self {
        Self {
            port,
            pid: None,
            status: Status::Paused,
            launch_args: Vec::new(),
            image_path: None,
            confirm,
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn pid(&self) -> Option<Pid> {
        self.pid
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn launch_args(&self) -> &[String] {
        &self.launch_args
    }

    /// Launch a new inferior from `args` and attach to it, stopped.
    ///
    /// Any existing inferior is dropped first, after asking whether to
    /// terminate it.
    pub fn exec(&mut self, args: &[String]) -> Result<()> {
        if args.is_empty() {
            return Err(Error::EmptyCommandLine);
        }

        if let Some(pid) = self.pid {
            if (self.confirm)(pid) {
                if let Err(errno) = self.port.terminate(pid) {
                    // The previous inferior probably exited; launch anyway.
                    warn!(%pid, %errno, "could not terminate inferior");
                }
            }

            self.detach()?;
        }

        let pid = self.port.spawn(args).map_err(|source| Error::Spawn { source })?;

        // Keep our own copy of argv, so `info` needn't dig through procfs.
        self.launch_args = args.to_vec();

        if let Err(err) = self.attach(&[pid.to_string()]) {
            self.launch_args.clear();
            return Err(err);
        }

        Ok(())
    }

    /// Attach to the process named by the single pid argument in `args`.
    pub fn attach(&mut self, args: &[String]) -> Result<()> {
        if self.pid.is_some() {
            // Never track two inferiors: drop the old one first, even if
            // the new attach then fails.
            self.detach()?;
        }

        if args.len() != 1 {
            return Err(Error::InvalidArgumentCount);
        }

        let pid = parse_pid(&args[0])?;

        println!("attaching to process {}", pid);

        self.port.attach(pid).map_err(|source| Error::Attach { pid, source })?;

        self.pid = Some(pid);
        self.status = Status::Paused;

        // argv of an externally attached pid is not recovered; `launch_args`
        // is only populated on the exec path.
        Ok(())
    }

    /// Detach from the current inferior, unconditionally resetting all
    /// inferior state.
    pub fn detach(&mut self) -> Result<()> {
        let pid = self.pid.ok_or(Error::NoInferior)?;

        if let Err(errno) = self.port.detach(pid) {
            // The inferior probably already exited; the reset still applies.
            warn!(%pid, %errno, "could not detach from inferior");
        }

        self.flush(pid);

        Ok(())
    }

    /// Resume the current inferior.
    pub fn cont(&mut self) -> Result<()> {
        let pid = self.pid.ok_or(Error::NoInferior)?;

        self.port
            .resume(pid, Some(Signal::SIGCONT))
            .map_err(|source| Error::Resume { pid, source })?;

        self.status = Status::Running;

        Ok(())
    }

    /// Report pid, launch arguments, and image path of the current inferior.
    pub fn info(&self) -> Result<()> {
        let pid = self.pid.ok_or(Error::NoInferior)?;

        println!("pid: {}", pid);
        println!("args({}):", self.launch_args.len());

        for (i, arg) in self.launch_args.iter().enumerate() {
            println!("\t{}: {}", i, arg);
        }

        println!("image: {}", self.image_path.as_deref().unwrap_or(""));

        Ok(())
    }

    /// Wind down the session, terminating or releasing any attached
    /// inferior. The caller must not evaluate further commands.
    pub fn quit(&mut self) -> Result<()> {
        let pid = match self.pid {
            Some(pid) => pid,
            None => return Ok(()),
        };

        if (self.confirm)(pid) {
            if let Err(errno) = self.port.terminate(pid) {
                // The inferior probably exited; quit anyway.
                warn!(%pid, %errno, "could not terminate inferior");
            }

            return Ok(());
        }

        self.detach()
    }

    /// Reconcile with the OS, once per loop iteration: observe inferior
    /// exit, and keep a stopped-but-running inferior moving. Never blocks.
    pub fn poll(&mut self) {
        let pid = match self.pid {
            Some(pid) => pid,
            None => return,
        };

        if self.status != Status::Running {
            return;
        }

        match self.port.wait_nonblocking(pid) {
            Ok(WaitStatus::StillAlive) => {},
            Ok(WaitStatus::Exited(_, code)) => {
                println!("inferior process {} exited with status {}", pid, code);
                self.flush(pid);
            },
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                warn!(%pid, %signal, "inferior terminated by signal");
                self.flush(pid);
            },
            Ok(status) => {
                // The inferior is in some stop; re-issue the continue
                // request to keep it moving.
                debug!(?status, "inferior stopped, continuing");

                if let Err(errno) = self.port.resume(pid, None) {
                    warn!(%pid, %errno, "could not continue inferior");

                    if errno == Errno::ESRCH {
                        // No such process: it is already gone.
                        self.flush(pid);
                    }
                }
            },
            Err(errno) => {
                warn!(%pid, %errno, "could not wait on inferior");

                if errno == Errno::ECHILD || errno == Errno::ESRCH {
                    self.flush(pid);
                }
            },
        }
    }

    // Reset all inferior state, atomically with clearing the pid.
    fn flush(&mut self, pid: Pid) {
        self.status = Status::Paused;
        self.launch_args.clear();
        self.image_path = None;
        self.pid = None;

        println!("detached from process {}", pid);
    }
}

fn parse_pid(arg: &str) -> Result<Pid> {
    let pid = arg.parse::<i32>().map_err(|_| Error::InvalidPid)?;

    if pid <= 0 {
        return Err(Error::InvalidPid);
    }

    Ok(Pid::from_raw(pid))
}

// Ask on the console whether the attached inferior should be terminated.
fn confirm_terminate(pid: Pid) -> bool {
    print!(
        "inferior process {} is still attached. Terminate it? [y/n]: ",
        pid
    );
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }

    matches!(line.trim().chars().next(), Some('y') | Some('Y'))
}
