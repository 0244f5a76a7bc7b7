//! sleep - delay for a specified amount of time

use std::process;

use mini_coreutils::cli;
use mini_coreutils::sleep::Sleep;

fn main() {
    process::exit(cli::run::<Sleep>());
}
