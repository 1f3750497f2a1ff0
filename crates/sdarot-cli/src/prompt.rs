use std::io::{self, BufRead, Stdout, StdinLock, Write};

use anyhow::{bail, Result};
use thiserror::Error;

/// Why a menu answer was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("Please enter a number.")]
    NotANumber,

    #[error("Please enter a number between {min} and {max}.")]
    OutOfRange { min: u32, max: u32 },

    #[error("Please enter a number no smaller than {min}.")]
    TooSmall { min: u32 },
}

/// Parse a menu answer; `max: None` leaves the range open-ended.
pub fn parse_choice(input: &str, min: u32, max: Option<u32>) -> Result<u32, ChoiceError> {
    let value: u32 = input.trim().parse().map_err(|_| ChoiceError::NotANumber)?;
    match max {
        Some(max) if value < min || value > max => Err(ChoiceError::OutOfRange { min, max }),
        None if value < min => Err(ChoiceError::TooSmall { min }),
        _ => Ok(value),
    }
}

/// Line-oriented console I/O for the menu.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn warn(&mut self, message: &str) -> Result<()> {
        self.say(&format!("! {message}"))
    }

    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.say(prompt)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed");
        }
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }

    /// Ask until the answer is a number within range.
    pub fn read_int(&mut self, prompt: &str, min: u32, max: Option<u32>) -> Result<u32> {
        loop {
            let line = self.read_line(prompt)?;
            match parse_choice(&line, min, max) {
                Ok(value) => return Ok(value),
                Err(e) => self.warn(&e.to_string())?,
            }
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}
