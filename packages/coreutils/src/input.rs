//! Input sources named on the command line.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use tracing::debug;

use crate::error::{Error, Result};

/// Where a utility reads from: standard input (`-` or no operand) or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn from_arg(arg: impl AsRef<OsStr>) -> Self {
        let arg = arg.as_ref();
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }

    /// One input per operand, or standard input alone when there are none.
    pub fn from_args(args: &[OsString]) -> Vec<Self> {
        if args.is_empty() {
            vec![Self::Stdin]
        } else {
            args.iter().map(|arg| Self::from_arg(arg)).collect()
        }
    }

    pub fn open(&self) -> Result<Box<dyn BufRead>> {
        self.open_with_len().map(|(reader, _)| reader)
    }

    /// Open the input and, for regular files, report their size.
    pub fn open_with_len(&self) -> Result<(Box<dyn BufRead>, Option<u64>)> {
        match self {
            Self::Stdin => {
                debug!("reading standard input");
                Ok((Box::new(io::stdin().lock()), None))
            }
            Self::File(path) => {
                debug!(path = %path.display(), "opening file");
                let file = File::open(path).map_err(|e| self.error(e))?;
                let meta = file.metadata().map_err(|e| self.error(e))?;
                let len = meta.is_file().then(|| meta.len());
                Ok((Box::new(BufReader::new(file)), len))
            }
        }
    }

    /// Wrap an I/O failure on this input.
    pub fn error(&self, source: io::Error) -> Error {
        Error::input(self.to_string(), source)
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("standard input"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
