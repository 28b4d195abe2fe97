//! querydeck CLI entry point
//!
//! Parsing, configuration and dispatch all live in `cli::run`; this only
//! reports failure and sets the exit code.

use querydeck::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
