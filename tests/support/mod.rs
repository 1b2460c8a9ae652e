#![allow(dead_code)]

use std::collections::VecDeque;

use ddb::{Debugger, Pid, ProcessPort, Signal, WaitStatus};
use nix::errno::Errno;

/// One recorded port request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    Spawn(Vec<String>),
    Attach(Pid),
    Detach(Pid),
    Resume(Pid, Option<Signal>),
    Wait(Pid),
    Terminate(Pid),
}

/// A scriptable [`ProcessPort`] that records every request, so controller
/// tests can run without real processes.
#[derive(Debug)]
pub struct FakePort {
    pub calls: Vec<Call>,

    /// Pid handed out by the next spawn request.
    pub next_pid: i32,

    /// Error injected into attach requests.
    pub attach_error: Option<Errno>,

    /// Error injected into resume requests.
    pub resume_error: Option<Errno>,

    /// Statuses returned by successive wait requests; when exhausted, the
    /// port reports `StillAlive`.
    pub wait_statuses: VecDeque<nix::Result<WaitStatus>>,
}

impl FakePort {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_pid: 100,
            attach_error: None,
            resume_error: None,
            wait_statuses: VecDeque::new(),
        }
    }

    pub fn resumes(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Resume(..)))
            .count()
    }

    pub fn detaches(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Detach(..)))
            .count()
    }

    pub fn terminations(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Terminate(..)))
            .count()
    }
}

impl ProcessPort for FakePort {
    fn spawn(&mut self, argv: &[String]) -> nix::Result<Pid> {
        self.calls.push(Call::Spawn(argv.to_vec()));
        Ok(Pid::from_raw(self.next_pid))
    }

    fn attach(&mut self, pid: Pid) -> nix::Result<()> {
        self.calls.push(Call::Attach(pid));

        match self.attach_error {
            Some(errno) => Err(errno),
            None => Ok(()),
        }
    }

    fn detach(&mut self, pid: Pid) -> nix::Result<()> {
        self.calls.push(Call::Detach(pid));
        Ok(())
    }

    fn resume(&mut self, pid: Pid, signal: Option<Signal>) -> nix::Result<()> {
        self.calls.push(Call::Resume(pid, signal));

        match self.resume_error {
            Some(errno) => Err(errno),
            None => Ok(()),
        }
    }

    fn wait_nonblocking(&mut self, pid: Pid) -> nix::Result<WaitStatus> {
        self.calls.push(Call::Wait(pid));

        self.wait_statuses
            .pop_front()
            .unwrap_or(Ok(WaitStatus::StillAlive))
    }

    fn terminate(&mut self, pid: Pid) -> nix::Result<()> {
        self.calls.push(Call::Terminate(pid));
        Ok(())
    }
}

/// A controller over a fake port, with the terminate-confirmation scripted
/// to a fixed answer.
pub fn debugger(port: FakePort, confirm: bool) -> Debugger<FakePort> {
    Debugger::with_confirm(port, Box::new(move |_| confirm))
}
