//! Command handlers for the `milbase` binary.

pub mod dashboard;
pub mod memo;
pub mod play;
pub mod tips;
pub mod vacation;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use milbase::store::Store;
use rand::rngs::StdRng;
use std::io::{self, BufRead, Write};

pub struct Ctx {
    pub store: Store,
    pub today: NaiveDate,
    pub rng: StdRng,
}

/// Print `prompt` and read one line. `None` on end of input.
pub fn ask(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush().context("flushing stdout")?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line).context("reading stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
}

/// `true` for an answer starting with y, `false` for anything else or end of input.
pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(ask(&format!("{prompt} [y/N] "))?.is_some_and(|a| a.trim().to_ascii_lowercase().starts_with('y')))
}

pub fn is_quit(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "q" | "quit" | "exit")
}
