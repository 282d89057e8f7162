//! ui::output
//!
//! Every line `vd` prints goes through here. Results go to stdout so they
//! can be piped; diagnostics (debug, warnings, errors) go to stderr.
//! Errors always print; everything else is gated by the verbosity picked
//! from the global flags.

use std::fmt::Display;

/// How much of the command's output to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// `--quiet`: results only where machine-readable, no chatter.
    Quiet,
    Normal,
    /// `--debug`: adds diagnostics such as locally computed hashes.
    Debug,
}

impl Verbosity {
    /// Resolve the global flags; `--quiet` wins over `--debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Debug,
            (false, false) => Verbosity::Normal,
        }
    }
}

/// A result line on stdout. Suppressed in quiet mode.
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{message}");
    }
}

/// A diagnostic line on stderr. Debug mode only.
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {message}");
    }
}

/// An error line on stderr. Never suppressed.
pub fn error(message: impl Display) {
    eprintln!("error: {message}");
}

/// A warning line on stderr. Suppressed in quiet mode.
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {message}");
    }
}

/// A confirmation line on stdout. Suppressed in quiet mode.
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{message}");
    }
}
