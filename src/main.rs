//! The completer command line interface.

#[macro_use]
extern crate tracing;

mod cli;
mod cnf;
mod err;
mod telemetry;

use std::process::ExitCode;

fn main() -> ExitCode {
	cli::init() // Initiate the command line
}
