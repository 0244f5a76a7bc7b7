//! head - output the first part of files

use std::ffi::OsString;
use std::io::{BufRead, ErrorKind, Write};

use clap::Parser;
use tracing::debug;

use crate::cli::{self, Command, Utility};
use crate::error::Result;
use crate::input::Input;

const DEFAULT_LINES: u64 = 10;

#[derive(Debug, Parser)]
#[command(
    name = "head",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct Args {
    #[arg(short = 'c', long = "bytes", value_name = "N", overrides_with = "lines")]
    bytes: Option<u64>,
    #[arg(
        short = 'n',
        long = "lines",
        alias = "count",
        value_name = "N",
        overrides_with = "bytes"
    )]
    lines: Option<u64>,
    #[arg(short = 'q', long = "quiet", alias = "silent", overrides_with = "verbose")]
    quiet: bool,
    #[arg(short = 'v', long = "verbose", overrides_with = "quiet")]
    verbose: bool,
    #[arg(short = 'h', long = "help")]
    help: bool,
    files: Vec<OsString>,
}

/// How much of each input to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Lines(u64),
    Bytes(u64),
}

impl Default for Mode {
    fn default() -> Self {
        Self::Lines(DEFAULT_LINES)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadOptions {
    pub mode: Mode,
    /// Print `==> name <==` before each input.
    pub headers: bool,
    pub inputs: Vec<Input>,
}

pub struct Head;

impl Utility for Head {
    const NAME: &'static str = "head";
    const USAGE: &'static str = "usage: head [OPTION ...] [FILE ...]";
    const HELP: &'static str = "\
Print the first part of FILE(s), or of standard input.
When more than one FILE is given, each is preceded by a header naming it.

  -c, --bytes=N             print the first N bytes
  -n, --lines=N             print the first N lines; default 10
  -NUM                      same as -n NUM
  -q, --quiet, --silent     never print file name headers
  -v, --verbose             always print file name headers
  -h, --help                print this help message and exit
";

    type Options = HeadOptions;

    fn parse(args: Vec<OsString>) -> Result<Command<HeadOptions>> {
        let args: Args = cli::parse_with(expand_count_shorthand(args))?;
        if args.help {
            return Ok(Command::Help);
        }

        let mode = match (args.bytes, args.lines) {
            (Some(n), _) => Mode::Bytes(n),
            (None, Some(n)) => Mode::Lines(n),
            (None, None) => Mode::default(),
        };
        let headers = args.verbose || (args.files.len() > 1 && !args.quiet);

        Ok(Command::Run(HeadOptions {
            mode,
            headers,
            inputs: Input::from_args(&args.files),
        }))
    }

    fn execute<W: Write>(options: HeadOptions, out: &mut W) -> Result<()> {
        head(&options, out)
    }
}

/// Rewrite `-NUM` into `-nNUM` ahead of `--`.
fn expand_count_shorthand(args: Vec<OsString>) -> Vec<OsString> {
    let mut operands_only = false;
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || operands_only {
                return arg;
            }
            if arg == "--" {
                operands_only = true;
                return arg;
            }
            let expanded = arg
                .to_str()
                .and_then(|text| text.strip_prefix('-'))
                .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                .map(|digits| OsString::from(format!("-n{digits}")));
            expanded.unwrap_or(arg)
        })
        .collect()
}

pub fn head<W: Write>(opts: &HeadOptions, out: &mut W) -> Result<()> {
    for (idx, input) in opts.inputs.iter().enumerate() {
        if opts.headers {
            if idx > 0 {
                writeln!(out)?;
            }
            writeln!(out, "==> {input} <==")?;
        }
        let reader = input.open()?;
        copy_head(reader, opts.mode, input, out)?;
    }
    Ok(())
}

fn copy_head<R: BufRead, W: Write>(reader: R, mode: Mode, input: &Input, out: &mut W) -> Result<()> {
    debug!(?mode, %input, "copying head");
    match mode {
        Mode::Bytes(n) => {
            let mut limited = reader.take(n);
            loop {
                let buf = match limited.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(input.error(e)),
                };
                if buf.is_empty() {
                    break;
                }
                let len = buf.len();
                out.write_all(buf)?;
                limited.consume(len);
            }
        }
        Mode::Lines(n) => {
            let mut reader = reader;
            let mut line = Vec::new();
            for _ in 0..n {
                line.clear();
                let read = reader
                    .read_until(b'\n', &mut line)
                    .map_err(|e| input.error(e))?;
                if read == 0 {
                    break;
                }
                out.write_all(&line)?;
            }
        }
    }
    Ok(())
}
