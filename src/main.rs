use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use ddb::error::Result;
use ddb::{repl, Debugger, Ptracer};

/// A dumb interactive debugger.
#[derive(Debug, StructOpt)]
#[structopt(name = "ddb")]
struct Opt {
    /// Attach to a running process instead of launching one.
    #[structopt(
        short = "a",
        long = "attach",
        value_name = "PID",
        conflicts_with = "argv"
    )]
    attach: Option<i32>,

    /// Program to launch, with its arguments.
    #[structopt(value_name = "PROGRAM")]
    argv: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let opt = Opt::from_args();

    let mut dbg = Debugger::new(Ptracer::new());

    let startup = if let Some(pid) = opt.attach {
        dbg.attach(&[pid.to_string()])
    } else if !opt.argv.is_empty() {
        dbg.exec(&opt.argv)
    } else {
        Ok(())
    };

    // A failed initial exec or attach still enters the session.
    if let Err(err) = startup {
        println!("{} {}", repl::ERROR_PREFIX, err);
    }

    repl::run(&mut dbg)
}
