//! Minimal reimplementations of a handful of Unix text utilities.
//!
//! Each utility lives in its own module and is wired to a binary under
//! `src/bin/` through [`cli::run`].

pub mod cat;
pub mod cli;
pub mod echo;
pub mod error;
pub mod head;
pub mod input;
pub mod ls;
pub mod sleep;
pub mod terminal;
pub mod wc;

pub use error::{Error, Result};
