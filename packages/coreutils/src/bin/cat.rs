//! cat - concatenate and print files

use std::process;

use mini_coreutils::cli;
use mini_coreutils::cat::Cat;

fn main() {
    process::exit(cli::run::<Cat>());
}
