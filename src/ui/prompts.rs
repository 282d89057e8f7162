//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail
//! with a clear error message.

use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        PromptError::IoError(e.to_string())
    }
}

/// Prompt for confirmation (yes/no).
///
/// Returns `Ok(true)` if the user confirms, `Ok(false)` if they decline.
/// An empty answer takes the default.
///
/// # Errors
///
/// `PromptError::NotInteractive` if not in interactive mode.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        eprint!("{} {} ", message, hint);
        io::stderr().flush()?;
        let answer = read_line()?;
        match answer.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => eprintln!("please answer y or n"),
        }
    }
}

/// Prompt for text input.
///
/// An empty answer takes the default when one is given.
///
/// # Errors
///
/// `PromptError::NotInteractive` if not in interactive mode.
pub fn input(
    message: &str,
    default: Option<&str>,
    interactive: bool,
) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    match default {
        Some(d) => eprint!("{} [{}]: ", message, d),
        None => eprint!("{}: ", message),
    }
    io::stderr().flush()?;
    let answer = read_line()?;
    let answer = answer.trim();
    if answer.is_empty() {
        match default {
            Some(d) => Ok(d.to_string()),
            None => Ok(String::new()),
        }
    } else {
        Ok(answer.to_string())
    }
}

/// Prompt for masked input (e.g., passwords).
///
/// The input is not echoed to the terminal.
///
/// # Errors
///
/// `PromptError::NotInteractive` if not in interactive mode.
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    rpassword::prompt_password(format!("{}: ", message))
        .map_err(|e| PromptError::IoError(e.to_string()))
}

fn read_line() -> Result<String, PromptError> {
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        // EOF on stdin counts as cancellation.
        return Err(PromptError::Cancelled);
    }
    Ok(line)
}
