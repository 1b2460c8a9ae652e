use std::process::Command;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use ntest::timeout;

use ddb::{Debugger, Ptracer, Status};

#[test]
#[timeout(10000)]
fn exec_then_poll_observes_exit() -> Result<()> {
    let mut dbg = Debugger::new(Ptracer::new());

    let argv: Vec<String> = vec!["sleep".into(), "0.2".into()];
    dbg.exec(&argv)?;

    assert!(dbg.pid().is_some());
    assert_eq!(dbg.status(), Status::Paused);
    assert_eq!(dbg.launch_args(), argv.as_slice());

    dbg.cont()?;
    assert_eq!(dbg.status(), Status::Running);

    while dbg.pid().is_some() {
        dbg.poll();
        thread::sleep(Duration::from_millis(10));
    }

    assert_eq!(dbg.status(), Status::Paused);
    assert!(dbg.launch_args().is_empty());

    Ok(())
}

#[test]
#[timeout(10000)]
fn attach_then_detach_releases_the_process() -> Result<()> {
    let mut child = Command::new("sleep").arg("5").spawn()?;

    let mut dbg = Debugger::new(Ptracer::new());

    dbg.attach(&[child.id().to_string()])?;
    assert_eq!(dbg.status(), Status::Paused);

    dbg.detach()?;
    assert!(dbg.pid().is_none());

    child.kill()?;
    child.wait()?;

    Ok(())
}
