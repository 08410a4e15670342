//! Runs the priority-inversion scenario on this machine and prints what
//! happened.
//!
//! With the default (literal) preset the process needs permission to use
//! real-time scheduling to get all forcing conditions; without it the run
//! degrades and says so.

mod args;

use args::Args;
use clap::Parser;
use isr_console::{ConsoleLogger, console_trace};
use isr_host::NativeHost;
use isr_scenario::ScenarioDriver;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    ConsoleLogger::new(args.log_level).init()?;

    let config = args.config();
    console_trace!("--- STARTING SIMULATION ---\n");
    if !config.forcing_conditions().all() {
        console_trace!("(forcing conditions relaxed; expect a clean run)\n");
    }

    let outcome = ScenarioDriver::new(NativeHost::default(), config).run()?;

    console_trace!("\n{}\n", outcome.report);
    // The task never ends on its own; the process exit takes it down.
    outcome.task.abandon();
    Ok(())
}
