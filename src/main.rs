use clap::Parser;
use memcalc::{logging, run, CliArgs};
use std::process;

// Exit codes; clap exits with 2 on usage errors by itself
const EXIT_ERROR: i32 = 1;

fn main() {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Bad log directives must be rejected before the logger is installed
    if let Err(error) = args.validate() {
        eprintln!("Error: {error}");
        process::exit(EXIT_ERROR);
    }

    logging::init(&args.log_directives());

    if let Err(error) = run(args) {
        tracing::debug!(?error, "command failed");
        eprintln!("Error: {error}");
        process::exit(EXIT_ERROR);
    }
}
