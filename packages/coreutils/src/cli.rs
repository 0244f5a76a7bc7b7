//! The harness every binary runs through: logging setup, argument parsing,
//! help output and the mapping from [`Error`] to an exit status.

use std::env;
use std::ffi::OsString;
use std::fmt::Debug;
use std::io::{self, BufWriter, ErrorKind, Write};

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// What a parsed command line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<T> {
    Help,
    Run(T),
}

/// A single command-line program.
pub trait Utility {
    const NAME: &'static str;
    /// One-line synopsis, printed with help and with every usage error.
    const USAGE: &'static str;
    /// Option summary printed after [`Utility::USAGE`] by `-h`/`--help`.
    const HELP: &'static str;

    type Options: Debug;

    /// Parse the full argument vector, program name included.
    fn parse(args: Vec<OsString>) -> Result<Command<Self::Options>>;

    fn execute<W: Write>(options: Self::Options, out: &mut W) -> Result<()>;
}

/// Run `U` against the process arguments and standard output, returning the
/// exit status.
pub fn run<U: Utility>() -> i32 {
    init_logging();

    // Operands are file names and need not be UTF-8.
    let args: Vec<OsString> = env::args_os().collect();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = invoke::<U, _>(args, &mut out);
    // Whatever made it into the buffer goes out before any error message.
    let flushed = out.flush().map_err(Error::from);

    match result.and(flushed) {
        Ok(()) => 0,
        Err(err) => {
            report::<U>(&err);
            1
        }
    }
}

/// Parse `args` and either print help or execute the utility into `out`.
pub fn invoke<U: Utility, W: Write>(args: Vec<OsString>, out: &mut W) -> Result<()> {
    match U::parse(args)? {
        Command::Help => {
            write!(out, "{}\n{}", U::USAGE, U::HELP)?;
            Ok(())
        }
        Command::Run(options) => {
            debug!(utility = U::NAME, ?options, "parsed options");
            U::execute(options, out)
        }
    }
}

fn report<U: Utility>(err: &Error) {
    match err {
        Error::Usage(_) => eprintln!("{}: {err}\n{}", U::NAME, U::USAGE),
        // A closed pipe downstream is not worth a message.
        Error::Output(e) if e.kind() == ErrorKind::BrokenPipe => {}
        _ => eprintln!("{}: {err}", U::NAME),
    }
}

/// Parse with clap, turning its error into a one-line usage message.
pub fn parse_with<P: clap::Parser>(args: Vec<OsString>) -> Result<P> {
    P::try_parse_from(args).map_err(|err| Error::Usage(clap_message(&err)))
}

fn clap_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

/// Send diagnostics to stderr. Silent unless `RUST_LOG` asks for something.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
