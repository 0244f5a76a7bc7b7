//! head - output the first part of files

use std::process;

use mini_coreutils::cli;
use mini_coreutils::head::Head;

fn main() {
    process::exit(cli::run::<Head>());
}
