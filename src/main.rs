//! marinenp CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`; errors are printed
//! to stderr with a non-zero exit.

use marinenp::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
