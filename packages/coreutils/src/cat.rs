//! cat - concatenate and print files

use std::ffi::OsString;
use std::io::{self, ErrorKind, Read, Write};

use clap::Parser;

use crate::cli::{self, Command, Utility};
use crate::error::Result;
use crate::input::Input;

#[derive(Debug, Parser)]
#[command(
    name = "cat",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct Args {
    #[arg(short = 'b', long = "number-nonblank")]
    number_nonblank: bool,
    #[arg(short = 'E', long = "show-ends")]
    show_ends: bool,
    #[arg(short = 'n', long = "number")]
    number: bool,
    #[arg(short = 's', long = "squeeze-blank")]
    squeeze_blank: bool,
    #[arg(short = 'T', long = "show-tabs")]
    show_tabs: bool,
    #[arg(short = 'h', long = "help")]
    help: bool,
    files: Vec<OsString>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatOptions {
    pub number_lines: bool,
    /// Only meaningful together with `number_lines`.
    pub number_nonblank: bool,
    pub squeeze_blank: bool,
    pub show_ends: bool,
    pub show_tabs: bool,
    pub inputs: Vec<Input>,
}

impl CatOptions {
    fn is_plain(&self) -> bool {
        !(self.number_lines || self.squeeze_blank || self.show_ends || self.show_tabs)
    }
}

pub struct Cat;

impl Utility for Cat {
    const NAME: &'static str = "cat";
    const USAGE: &'static str = "usage: cat [OPTION ...] [FILE ...]";
    const HELP: &'static str = "\
Concatenate FILE(s), or standard input, to standard output.

  -b, --number-nonblank     number only non-blank lines
  -E, --show-ends           print $ at the end of each line
  -n, --number              number output lines, starting with 1
  -s, --squeeze-blank       print no more than one consecutive blank line
  -T, --show-tabs           print tab characters as ^I
  -h, --help                print this help message and exit
";

    type Options = CatOptions;

    fn parse(args: Vec<OsString>) -> Result<Command<CatOptions>> {
        let args: Args = cli::parse_with(args)?;
        if args.help {
            return Ok(Command::Help);
        }
        Ok(Command::Run(CatOptions {
            number_lines: args.number || args.number_nonblank,
            number_nonblank: args.number_nonblank,
            squeeze_blank: args.squeeze_blank,
            show_ends: args.show_ends,
            show_tabs: args.show_tabs,
            inputs: Input::from_args(&args.files),
        }))
    }

    fn execute<W: Write>(options: CatOptions, out: &mut W) -> Result<()> {
        cat(&options, out)
    }
}

/// Copy every input to `out` in order, applying the requested transforms.
pub fn cat<W: Write>(opts: &CatOptions, out: &mut W) -> Result<()> {
    let mut formatter = Formatter::new(opts);
    for input in &opts.inputs {
        let reader = input.open()?;
        copy_input(reader, input, &mut formatter, out)?;
    }
    Ok(())
}

fn copy_input<R: Read, W: Write>(
    mut reader: R,
    input: &Input,
    formatter: &mut Formatter<'_>,
    out: &mut W,
) -> Result<()> {
    let mut buf = [0u8; 8192];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(input.error(e)),
        };
        if formatter.opts.is_plain() {
            out.write_all(&buf[..n])?;
        } else {
            let rendered = formatter.format(&buf[..n])?;
            out.write_all(&rendered)?;
        }
        out.flush()?;
    }
    Ok(())
}

/// Per-invocation line state, carried from one input to the next.
///
/// Bytes are handled one at a time. A multi-byte UTF-8 sequence never
/// contains a tab or newline byte, so valid and invalid text pass through
/// the same way and only those two bytes are ever rewritten.
struct Formatter<'a> {
    opts: &'a CatOptions,
    line_number: usize,
    at_line_start: bool,
    /// The last two bytes emitted, most recent first.
    lookback: [u8; 2],
}

impl<'a> Formatter<'a> {
    fn new(opts: &'a CatOptions) -> Self {
        Self {
            opts,
            line_number: 0,
            at_line_start: true,
            // As if a line had just ended, so leading blank lines squeeze too.
            lookback: [b'\n', 0],
        }
    }

    fn format(&mut self, chunk: &[u8]) -> io::Result<Vec<u8>> {
        let mut rendered = Vec::with_capacity(chunk.len() + chunk.len() / 4);
        for &byte in chunk {
            if self.opts.squeeze_blank && byte == b'\n' && self.lookback == [b'\n', b'\n'] {
                continue;
            }
            self.lookback = [byte, self.lookback[0]];

            if self.opts.number_lines
                && self.at_line_start
                && (byte != b'\n' || !self.opts.number_nonblank)
            {
                self.line_number += 1;
                write!(rendered, "{:>6}\t", self.line_number)?;
                self.at_line_start = false;
            }

            match byte {
                b'\t' if self.opts.show_tabs => rendered.extend_from_slice(b"^I"),
                b'\n' => {
                    self.at_line_start = true;
                    if self.opts.show_ends {
                        rendered.push(b'$');
                    }
                    rendered.push(b'\n');
                }
                _ => rendered.push(byte),
            }
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(opts: &CatOptions, chunks: &[&str]) -> String {
        let mut formatter = Formatter::new(opts);
        let mut out = Vec::new();
        for chunk in chunks {
            copy_input(Cursor::new(chunk.as_bytes()), &Input::Stdin, &mut formatter, &mut out)
                .unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn parse(args: &[&str]) -> Command<CatOptions> {
        let mut argv = vec![OsString::from("cat")];
        argv.extend(args.iter().map(OsString::from));
        Cat::parse(argv).unwrap()
    }

    fn numbered() -> CatOptions {
        CatOptions {
            number_lines: true,
            ..CatOptions::default()
        }
    }

    #[test]
    fn plain_copy_is_verbatim() {
        let opts = CatOptions::default();
        assert_eq!(run(&opts, &["a\tb\n\n\n\nc"]), "a\tb\n\n\n\nc");
    }

    #[test]
    fn numbers_every_line() {
        assert_eq!(
            run(&numbered(), &["x\n\ny\n"]),
            "     1\tx\n     2\t\n     3\ty\n"
        );
    }

    #[test]
    fn numbering_continues_across_inputs() {
        assert_eq!(run(&numbered(), &["a\n", "b\n"]), "     1\ta\n     2\tb\n");
    }

    #[test]
    fn nonblank_numbering_skips_blank_lines() {
        let opts = CatOptions {
            number_lines: true,
            number_nonblank: true,
            ..CatOptions::default()
        };
        assert_eq!(run(&opts, &["a\n\nb\n"]), "     1\ta\n\n     2\tb\n");
    }

    #[test]
    fn squeeze_collapses_blank_runs() {
        let opts = CatOptions {
            squeeze_blank: true,
            ..CatOptions::default()
        };
        assert_eq!(run(&opts, &["a\n\n\n\nb\n"]), "a\n\nb\n");
        assert_eq!(run(&opts, &["a\n\nb\n"]), "a\n\nb\n");
        assert_eq!(run(&opts, &["\n\n\nb\n"]), "\nb\n");
    }

    #[test]
    fn squeeze_spans_chunk_boundaries() {
        let opts = CatOptions {
            squeeze_blank: true,
            ..CatOptions::default()
        };
        assert_eq!(run(&opts, &["a\n\n", "\n", "\nb\n"]), "a\n\nb\n");
    }

    #[test]
    fn squeeze_then_number() {
        let opts = CatOptions {
            number_lines: true,
            squeeze_blank: true,
            ..CatOptions::default()
        };
        assert_eq!(
            run(&opts, &["a\n\n\n\nb\n"]),
            "     1\ta\n     2\t\n     3\tb\n"
        );
    }

    #[test]
    fn shows_tabs_and_ends() {
        let opts = CatOptions {
            show_tabs: true,
            show_ends: true,
            ..CatOptions::default()
        };
        assert_eq!(run(&opts, &["a\tb\n\n"]), "a^Ib$\n$\n");
    }

    #[test]
    fn invalid_utf8_passes_through() {
        let opts = numbered();
        let mut formatter = Formatter::new(&opts);
        let rendered = formatter.format(b"\xff\xfeok\n").unwrap();
        assert_eq!(rendered, b"     1\t\xff\xfeok\n");
    }

    #[test]
    fn parse_number_nonblank_implies_numbering() {
        let Command::Run(opts) = parse(&["-b"]) else {
            panic!("expected run");
        };
        assert!(opts.number_lines);
        assert!(opts.number_nonblank);
        assert_eq!(opts.inputs, vec![Input::Stdin]);
    }

    #[test]
    fn parse_clustered_flags_and_files() {
        let Command::Run(opts) = parse(&["-sT", "--show-ends", "a", "-", "--", "-n"]) else {
            panic!("expected run");
        };
        assert!(opts.squeeze_blank);
        assert!(opts.show_tabs);
        assert!(opts.show_ends);
        assert!(!opts.number_lines);
        assert_eq!(
            opts.inputs,
            vec![Input::from_arg("a"), Input::Stdin, Input::from_arg("-n")]
        );
    }

    #[test]
    fn parse_help() {
        assert_eq!(parse(&["--help"]), Command::Help);
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        let err = Cat::parse(vec!["cat".into(), "-z".into()]).unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let opts = CatOptions {
            inputs: vec![
                Input::File(dir.path().join("missing")),
                Input::File(dir.path().join("also-missing")),
            ],
            ..CatOptions::default()
        };
        let mut out = Vec::new();
        let err = cat(&opts, &mut out).unwrap_err();
        assert!(!err.is_usage());
        assert!(err.to_string().contains("missing"));
        assert!(out.is_empty());
    }

    #[test]
    fn concatenates_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, "one\n").unwrap();
        std::fs::write(&b, "two\n").unwrap();

        let opts = CatOptions {
            number_lines: true,
            inputs: vec![Input::File(a), Input::File(b)],
            ..CatOptions::default()
        };
        let mut out = Vec::new();
        cat(&opts, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "     1\tone\n     2\ttwo\n");
    }
}
