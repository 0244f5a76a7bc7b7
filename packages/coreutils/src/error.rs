//! Errors shared by every utility.

use std::io;

/// Everything that can stop a utility before it finishes.
///
/// Usage errors are reported together with the usage line; the other
/// variants are reported on their own. All of them exit with status 1.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("{name}: {source}")]
    Input {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("write error: {0}")]
    Output(#[from] io::Error),
}

impl Error {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn input(name: impl Into<String>, source: io::Error) -> Self {
        Self::Input {
            name: name.into(),
            source,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
