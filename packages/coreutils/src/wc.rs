//! wc - print byte, line, or word counts

use std::ffi::OsString;
use std::io::{self, BufRead, ErrorKind, Write};
use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use tracing::debug;

use crate::cli::{self, Command, Utility};
use crate::error::Result;
use crate::input::Input;

#[derive(Debug, Parser)]
#[command(
    name = "wc",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true,
    group(ArgGroup::new("count").args(["bytes", "lines", "words"]).multiple(false))
)]
struct Args {
    #[arg(short = 'c', long = "bytes")]
    bytes: bool,
    #[arg(short = 'l', long = "lines")]
    lines: bool,
    #[arg(short = 'w', long = "words")]
    words: bool,
    #[arg(short = 'h', long = "help")]
    help: bool,
    files: Vec<PathBuf>,
}

/// The single quantity counted for every input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Count {
    /// No flag given: every count is zero and nothing is read.
    #[default]
    Nothing,
    Bytes,
    Lines,
    Words,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WcOptions {
    pub count: Count,
    /// File operands as given; empty means unnamed standard input.
    pub files: Vec<PathBuf>,
}

pub struct Wc;

impl Utility for Wc {
    const NAME: &'static str = "wc";
    const USAGE: &'static str = "usage: wc [OPTION ...] [FILE ...]";
    const HELP: &'static str = "\
Print a byte, line, or word count for each FILE, or for standard input.

  -c, --bytes     count bytes
  -l, --lines     count newlines
  -w, --words     count words
  -h, --help      print this help message and exit
";

    type Options = WcOptions;

    fn parse(args: Vec<OsString>) -> Result<Command<WcOptions>> {
        let args: Args = cli::parse_with(args)?;
        if args.help {
            return Ok(Command::Help);
        }
        let count = if args.bytes {
            Count::Bytes
        } else if args.lines {
            Count::Lines
        } else if args.words {
            Count::Words
        } else {
            Count::Nothing
        };
        Ok(Command::Run(WcOptions {
            count,
            files: args.files,
        }))
    }

    fn execute<W: Write>(options: WcOptions, out: &mut W) -> Result<()> {
        wc(&options, out)
    }
}

pub fn wc<W: Write>(opts: &WcOptions, out: &mut W) -> Result<()> {
    if opts.files.is_empty() {
        let input = Input::Stdin;
        let n = count_input(&input, opts.count)?;
        writeln!(out, "{n}")?;
        return Ok(());
    }
    for file in &opts.files {
        let input = Input::from_arg(file);
        let n = count_input(&input, opts.count)?;
        writeln!(out, "{n} {}", file.display())?;
    }
    Ok(())
}

fn count_input(input: &Input, count: Count) -> Result<u64> {
    let (reader, len) = input.open_with_len()?;
    let n = count_reader(reader, count, len).map_err(|e| input.error(e))?;
    debug!(%input, ?count, n, "counted");
    Ok(n)
}

/// Count `what` in `reader`. A known `len` answers a byte count without reading.
pub fn count_reader<R: BufRead>(mut reader: R, what: Count, len: Option<u64>) -> io::Result<u64> {
    let mut total = 0u64;
    let mut in_word = false;
    match (what, len) {
        (Count::Nothing, _) => return Ok(0),
        (Count::Bytes, Some(len)) => return Ok(len),
        _ => {}
    }
    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if chunk.is_empty() {
            break;
        }
        total += match what {
            Count::Bytes => chunk.len() as u64,
            Count::Lines => chunk.iter().filter(|&&b| b == b'\n').count() as u64,
            Count::Words => count_word_starts(chunk, &mut in_word),
            Count::Nothing => 0,
        };
        let used = chunk.len();
        reader.consume(used);
    }
    Ok(total)
}

/// Words started in `chunk`; `in_word` carries across chunk boundaries.
fn count_word_starts(chunk: &[u8], in_word: &mut bool) -> u64 {
    let mut starts = 0;
    for &b in chunk {
        let space = b.is_ascii_whitespace() || b == 0x0B;
        if !space && !*in_word {
            starts += 1;
        }
        *in_word = !space;
    }
    starts
}
