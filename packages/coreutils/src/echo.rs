//! echo - display a line of text

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::Write;

use crate::cli::{Command, Utility};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoOptions {
    /// Operands joined with single spaces, escapes not yet expanded.
    pub text: Vec<u8>,
    pub trailing_newline: bool,
}

pub struct Echo;

impl Utility for Echo {
    const NAME: &'static str = "echo";
    const USAGE: &'static str = "usage: echo [OPTION ...] [STRING ...]";
    const HELP: &'static str = "\
Print STRING arguments to standard output.
Backslash escape sequences in STRING are interpreted.

  -n                        do not print a trailing newline character
  -h, --help                print this help message and exit
";

    type Options = EchoOptions;

    /// Flags are only recognized in first position; everything else is text.
    fn parse(args: Vec<OsString>) -> Result<Command<EchoOptions>> {
        let mut operands = args.get(1..).unwrap_or_default();
        let mut trailing_newline = true;
        match operands.first().and_then(|arg| arg.to_str()) {
            Some("-h" | "--help") => return Ok(Command::Help),
            Some("-n") => {
                trailing_newline = false;
                operands = &operands[1..];
            }
            _ => {}
        }
        Ok(Command::Run(EchoOptions {
            text: operands
                .iter()
                .map(|arg| raw_bytes(arg))
                .collect::<Vec<_>>()
                .join(&b' '),
            trailing_newline,
        }))
    }

    fn execute<W: Write>(options: EchoOptions, out: &mut W) -> Result<()> {
        let (mut bytes, stopped) = expand_escapes(&options.text);
        if options.trailing_newline && !stopped {
            bytes.push(b'\n');
        }
        out.write_all(&bytes)?;
        Ok(())
    }
}

#[cfg(unix)]
fn raw_bytes(arg: &OsStr) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(arg.as_bytes())
}

#[cfg(not(unix))]
fn raw_bytes(arg: &OsStr) -> Cow<'_, [u8]> {
    match arg.to_string_lossy() {
        Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
        Cow::Owned(text) => Cow::Owned(text.into_bytes()),
    }
}

/// Expand backslash escapes in `text`.
///
/// Returns the expanded bytes and whether `\c` cut the output short.
pub fn expand_escapes(bytes: &[u8]) -> (Vec<u8>, bool) {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 == bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        match bytes[i + 1] {
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'c' => return (out, true),
            b'e' => out.push(0x1B),
            b'f' => out.push(0x0C),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0B),
            other => {
                out.push(b'\\');
                out.push(other);
            }
        }
        i += 2;
    }
    (out, false)
}
