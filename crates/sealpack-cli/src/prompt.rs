//! Interactive password prompts.

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use console::Term;

/// Returns `true` if a password can be read from the terminal.
#[must_use]
pub fn is_interactive() -> bool {
    Term::stderr().is_term()
}

/// Reads a password without echo.
pub fn read_password(prompt: &str) -> Result<String> {
    let term = Term::stderr();
    if !term.is_term() {
        bail!("Cannot prompt for a password: not a terminal");
    }
    term.write_str(prompt).context("failed to write prompt")?;
    term.read_secure_line().context("failed to read password")
}

/// Reads a new password twice and requires both entries to match.
pub fn read_new_password() -> Result<String> {
    let first = read_password("Password: ")?;
    let second = read_password("Confirm password: ")?;
    if first != second {
        bail!("Passwords do not match");
    }
    if first.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(first)
}
