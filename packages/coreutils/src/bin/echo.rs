//! echo - display a line of text

use std::process;

use mini_coreutils::cli;
use mini_coreutils::echo::Echo;

fn main() {
    process::exit(cli::run::<Echo>());
}
