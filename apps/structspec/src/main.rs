mod cli;

use std::process;

fn main() {
    if let Err(err) = cli::run() {
        // `{:#}` prints the whole context chain on one line
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}
