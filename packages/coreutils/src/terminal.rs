//! Terminal width lookup for layouts that wrap to the screen.

/// Width used when the output is not a terminal or its size is unknown.
pub const FALLBACK_COLUMNS: usize = 78;

/// Something that can report how many columns the output has.
pub trait TerminalSize {
    /// `None` when the width cannot be determined.
    fn columns(&self) -> Option<usize>;

    fn columns_or_fallback(&self) -> usize {
        self.columns().unwrap_or(FALLBACK_COLUMNS)
    }
}

/// Asks the OS for the size of the terminal attached to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl TerminalSize for Stdout {
    #[cfg(unix)]
    fn columns(&self) -> Option<usize> {
        let mut size = libc::winsize {
            ws_row: 0,
            ws_col: 0,
            ws_xpixel: 0,
            ws_ypixel: 0,
        };
        // SAFETY: TIOCGWINSZ only writes into the winsize struct we pass.
        let ret = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
        if ret == 0 && size.ws_col > 0 {
            Some(usize::from(size.ws_col))
        } else {
            None
        }
    }

    #[cfg(not(unix))]
    fn columns(&self) -> Option<usize> {
        None
    }
}

/// A terminal of known width, or of no width at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed(pub Option<usize>);

impl TerminalSize for Fixed {
    fn columns(&self) -> Option<usize> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_is_reported() {
        assert_eq!(Fixed(Some(120)).columns_or_fallback(), 120);
    }

    #[test]
    fn unknown_width_falls_back() {
        assert_eq!(Fixed(None).columns_or_fallback(), FALLBACK_COLUMNS);
    }
}
