//! ls - list directory contents

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;

use crate::cli::{self, Command, Utility};
use crate::error::{Error, Result};
use crate::terminal::{self, TerminalSize};

#[derive(Debug, Parser)]
#[command(
    name = "ls",
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true
)]
struct Args {
    #[arg(short = 'A', long = "almost-all")]
    almost_all: bool,
    #[arg(short = 'B', long = "ignore-backups")]
    ignore_backups: bool,
    #[arg(short = 'm')]
    commas: bool,
    #[arg(short = 'Q', long = "quote-name")]
    quote_name: bool,
    #[arg(short = '1')]
    one_per_line: bool,
    #[arg(short = 'h', long = "help")]
    help: bool,
    paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    OnePerLine,
    Commas,
    #[default]
    Columns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsOptions {
    pub almost_all: bool,
    pub ignore_backups: bool,
    pub quote_names: bool,
    pub layout: Layout,
    pub paths: Vec<PathBuf>,
}

impl Default for LsOptions {
    fn default() -> Self {
        Self {
            almost_all: false,
            ignore_backups: false,
            quote_names: false,
            layout: Layout::default(),
            paths: vec![PathBuf::from(".")],
        }
    }
}

pub struct Ls;

impl Utility for Ls {
    const NAME: &'static str = "ls";
    const USAGE: &'static str = "usage: ls [OPTION ...] [FILE ...]";
    const HELP: &'static str = "\
List files and directories.

  -A, --almost-all      include entries beginning with a dot, except
                        the implied . and ..
  -B, --ignore-backups  do not list entries ending with ~
  -m                    print a comma-separated list of entries
  -Q, --quote-name      print each entry surrounded by double quotes
  -1                    print one entry per line
  -h, --help            print this help message and exit
";

    type Options = LsOptions;

    fn parse(args: Vec<OsString>) -> Result<Command<LsOptions>> {
        let args: Args = cli::parse_with(args)?;
        if args.help {
            return Ok(Command::Help);
        }

        let layout = if args.one_per_line {
            Layout::OnePerLine
        } else if args.commas {
            Layout::Commas
        } else {
            Layout::Columns
        };
        let paths = if args.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            args.paths
        };

        Ok(Command::Run(LsOptions {
            almost_all: args.almost_all,
            ignore_backups: args.ignore_backups,
            quote_names: args.quote_name,
            layout,
            paths,
        }))
    }

    fn execute<W: Write>(options: LsOptions, out: &mut W) -> Result<()> {
        ls(&options, &terminal::Stdout, out)
    }
}

/// List every path in `opts`, laying names out for `terminal`'s width.
pub fn ls<T, W>(opts: &LsOptions, terminal: &T, out: &mut W) -> Result<()>
where
    T: TerminalSize + ?Sized,
    W: Write,
{
    let width = terminal.columns_or_fallback();
    let headers = opts.paths.len() > 1;

    for (idx, path) in opts.paths.iter().enumerate() {
        let meta = fs::metadata(path).map_err(|e| access_error(path, e))?;
        let (header, names) = if meta.is_dir() {
            let names = read_names(path)?
                .into_iter()
                .filter(|name| keep(name, opts))
                .collect();
            (headers.then(|| format!("{}:", path.display())), names)
        } else {
            (None, vec![path.display().to_string()])
        };

        if idx > 0 {
            writeln!(out)?;
        }
        if let Some(header) = header {
            writeln!(out, "{header}")?;
        }

        let names: Vec<String> = if opts.quote_names {
            names.iter().map(|name| format!("\"{name}\"")).collect()
        } else {
            names
        };
        match opts.layout {
            Layout::OnePerLine => write_lines(&names, out)?,
            Layout::Commas => write_commas(&names, width, out)?,
            Layout::Columns => write_columns(&names, width, out)?,
        }
    }
    Ok(())
}

fn access_error(path: &Path, source: std::io::Error) -> Error {
    Error::input(format!("cannot access '{}'", path.display()), source)
}

/// Names of the immediate children of `dir`, sorted bytewise.
fn read_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| access_error(dir, e))? {
        let entry = entry.map_err(|e| access_error(dir, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    debug!(dir = %dir.display(), entries = names.len(), "read directory");
    Ok(names)
}

fn keep(name: &str, opts: &LsOptions) -> bool {
    if !opts.almost_all && name.starts_with('.') {
        return false;
    }
    !(opts.ignore_backups && name.ends_with('~'))
}

fn write_lines<W: Write>(names: &[String], out: &mut W) -> Result<()> {
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// `a, b, c`, breaking the line before it would reach `width`.
fn write_commas<W: Write>(names: &[String], width: usize, out: &mut W) -> Result<()> {
    let mut line = String::new();
    let mut line_width = 0;
    for (i, name) in names.iter().enumerate() {
        let mut piece = name.clone();
        if i + 1 < names.len() {
            piece.push_str(", ");
        }
        let piece_width = piece.chars().count();

        if line_width > 0 && line_width + piece_width >= width {
            writeln!(out, "{}", line.trim_end())?;
            line.clear();
            line_width = 0;
        }
        line.push_str(&piece);
        line_width += piece_width;
    }
    if !line.is_empty() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Left-justified grid, filled row by row.
fn write_columns<W: Write>(names: &[String], width: usize, out: &mut W) -> Result<()> {
    let longest = names.iter().map(|n| n.chars().count()).max().unwrap_or(0);
    let column_width = longest + 1;
    let columns = (width / column_width).max(1);
    debug!(width, column_width, columns, "column layout");

    for (i, name) in names.iter().enumerate() {
        write!(out, "{name:<column_width$}")?;
        if i % columns == columns - 1 {
            writeln!(out)?;
        }
    }
    if names.len() % columns != 0 {
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::Fixed;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn parse(args: &[&str]) -> LsOptions {
        let mut argv = vec![OsString::from("ls")];
        argv.extend(args.iter().map(OsString::from));
        match Ls::parse(argv).unwrap() {
            Command::Run(opts) => opts,
            Command::Help => panic!("expected run"),
        }
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b", "a", ".hidden", "notes~"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        dir
    }

    fn list(opts: LsOptions, dir: &Path) -> String {
        let opts = LsOptions {
            paths: vec![dir.to_path_buf()],
            ..opts
        };
        render(|out| ls(&opts, &Fixed(Some(80)), out))
    }

    #[test]
    fn one_per_line_hides_dotfiles() {
        let dir = fixture();
        let opts = LsOptions {
            layout: Layout::OnePerLine,
            ..LsOptions::default()
        };
        assert_eq!(list(opts, dir.path()), "a\nb\nnotes~\n");
    }

    #[test]
    fn almost_all_shows_dotfiles() {
        let dir = fixture();
        let opts = LsOptions {
            layout: Layout::OnePerLine,
            almost_all: true,
            ..LsOptions::default()
        };
        assert_eq!(list(opts, dir.path()), ".hidden\na\nb\nnotes~\n");
    }

    #[test]
    fn ignore_backups_drops_tilde_names() {
        let dir = fixture();
        let opts = LsOptions {
            layout: Layout::OnePerLine,
            ignore_backups: true,
            ..LsOptions::default()
        };
        assert_eq!(list(opts, dir.path()), "a\nb\n");
    }

    #[test]
    fn quoting_applies_to_every_layout() {
        let dir = fixture();
        let opts = LsOptions {
            quote_names: true,
            ignore_backups: true,
            ..LsOptions::default()
        };
        let lines = LsOptions {
            layout: Layout::OnePerLine,
            ..opts.clone()
        };
        let commas = LsOptions {
            layout: Layout::Commas,
            ..opts.clone()
        };
        assert_eq!(list(lines, dir.path()), "\"a\"\n\"b\"\n");
        assert_eq!(list(commas, dir.path()), "\"a\", \"b\"\n");
        assert_eq!(list(opts, dir.path()), "\"a\" \"b\" \n");
    }

    #[test]
    fn plain_file_lists_itself() {
        let dir = fixture();
        let file = dir.path().join(".hidden");
        let opts = LsOptions {
            layout: Layout::OnePerLine,
            paths: vec![file.clone()],
            ..LsOptions::default()
        };
        let listing = render(|out| ls(&opts, &Fixed(None), out));
        assert_eq!(listing, format!("{}\n", file.display()));
    }

    #[test]
    fn several_paths_get_headers() {
        let first = fixture();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("z"), "").unwrap();

        let opts = LsOptions {
            layout: Layout::OnePerLine,
            paths: vec![first.path().to_path_buf(), second.path().to_path_buf()],
            ..LsOptions::default()
        };
        let listing = render(|out| ls(&opts, &Fixed(None), out));
        let expected = format!(
            "{}:\na\nb\nnotes~\n\n{}:\nz\n",
            first.path().display(),
            second.path().display()
        );
        assert_eq!(listing, expected);
    }

    #[test]
    fn missing_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let opts = LsOptions {
            paths: vec![dir.path().join("gone")],
            ..LsOptions::default()
        };
        let mut out = Vec::new();
        let err = ls(&opts, &Fixed(None), &mut out).unwrap_err();
        assert!(err.to_string().starts_with("cannot access '"));
        assert!(!err.is_usage());
    }

    #[test]
    fn empty_directory_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(list(LsOptions::default(), dir.path()), "");
    }

    #[test]
    fn columns_fill_rows_left_to_right() {
        let listing = render(|out| write_columns(&names(&["a", "bb", "ccc"]), 10, out));
        assert_eq!(listing, "a   bb  \nccc \n");
    }

    #[test]
    fn columns_end_cleanly_on_full_row() {
        let listing = render(|out| write_columns(&names(&["a", "b"]), 4, out));
        assert_eq!(listing, "a b \n");
    }

    #[test]
    fn columns_never_drop_below_one() {
        let listing = render(|out| write_columns(&names(&["wide-name", "x"]), 4, out));
        assert_eq!(listing, "wide-name \nx         \n");
    }

    #[test]
    fn columns_use_fallback_width() {
        let many: Vec<String> = (0..30).map(|i| format!("f{i:02}")).collect();
        let opts_width = Fixed(None).columns_or_fallback();
        let listing = render(|out| write_columns(&many, opts_width, out));
        // 78 / 4 = 19 names on the first row.
        let first_row = listing.lines().next().unwrap();
        assert_eq!(first_row.split_whitespace().count(), 19);
        assert_eq!(listing.lines().count(), 2);
    }

    #[test]
    fn commas_wrap_before_width() {
        let listing = render(|out| write_commas(&names(&["a", "b", "c", "d"]), 10, out));
        assert_eq!(listing, "a, b, c,\nd\n");
    }

    #[test]
    fn commas_fit_on_one_line() {
        let listing = render(|out| write_commas(&names(&["a", "b"]), 78, out));
        assert_eq!(listing, "a, b\n");
    }

    #[test]
    fn parse_layout_priority() {
        assert_eq!(parse(&[]).layout, Layout::Columns);
        assert_eq!(parse(&["-m"]).layout, Layout::Commas);
        assert_eq!(parse(&["-m", "-1"]).layout, Layout::OnePerLine);
        assert_eq!(parse(&["-1m"]).layout, Layout::OnePerLine);
    }

    #[test]
    fn parse_defaults_to_current_directory() {
        assert_eq!(parse(&[]).paths, vec![PathBuf::from(".")]);
        assert_eq!(parse(&["-AB", "x"]).paths, vec![PathBuf::from("x")]);
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        let err = Ls::parse(vec!["ls".into(), "-l".into()]).unwrap_err();
        assert!(err.is_usage());
    }
}
