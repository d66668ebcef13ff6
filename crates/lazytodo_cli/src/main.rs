//! LazyTodo command-line entry point.

use std::process::ExitCode;

mod cli;
mod output;

fn main() -> ExitCode {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
