//! wc - print byte, line, or word counts

use std::process;

use mini_coreutils::cli;
use mini_coreutils::wc::Wc;

fn main() {
    process::exit(cli::run::<Wc>());
}
