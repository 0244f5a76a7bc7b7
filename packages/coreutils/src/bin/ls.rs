//! ls - list directory contents

use std::process;

use mini_coreutils::cli;
use mini_coreutils::ls::Ls;

fn main() {
    process::exit(cli::run::<Ls>());
}
